//! Rule-based helpers for comprobante field extraction.

pub mod identifier;
pub mod patterns;
pub mod references;

pub use identifier::{normalize, variants};
pub use references::{
    clean_encoded_text, purchase_order, reception_from_fallback, reception_from_primary,
};
