//! Core library for the cpeflow invoice intake pipeline.
//!
//! This crate provides:
//! - UBL invoice document reading (path-addressable XML tree)
//! - Invoice-identifier normalization and variant generation
//! - Registry tables with heuristic column-role detection and
//!   two-phase project-code matching
//! - Comprobante filename classification and destination planning

pub mod error;
pub mod files;
pub mod invoice;
pub mod models;
pub mod registry;
pub mod xml;

pub use error::{CpeflowError, ExtractionError, RegistryError, Result, XmlError};
pub use files::{classify, FileCategory};
pub use invoice::InvoiceExtractor;
pub use models::config::CpeflowConfig;
pub use models::invoice::InvoiceRecord;
pub use registry::{
    detect_columns, find_project_code, ColumnRoles, MatchPhase, ProjectMatch, RegistryTable,
};
pub use xml::UblDocument;
