//! Invoice field extraction from UBL documents.

pub mod extractor;
pub mod rules;

pub use extractor::InvoiceExtractor;
