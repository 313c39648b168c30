//! Error types for the cpeflow-core library.

use thiserror::Error;

/// Main error type for the cpeflow library.
#[derive(Error, Debug)]
pub enum CpeflowError {
    /// Registry loading or lookup error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Invoice document reading error.
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to registry tables.
///
/// A missing or empty registry is a structural failure: matching every
/// invoice against zero rows would silently turn a misconfiguration into
/// all-soft-miss output, so loading stops the batch instead.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry file does not exist.
    #[error("registry file not found: {0}")]
    NotFound(String),

    /// The registry parsed but contains no rows.
    #[error("registry has no rows: {0}")]
    Empty(String),

    /// Failed to read or parse the delimited file.
    #[error("failed to read registry: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while opening the registry.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to XML document reading.
#[derive(Error, Debug)]
pub enum XmlError {
    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// The document has no root element.
    #[error("document has no root element")]
    NoRoot,
}

/// Errors related to invoice field extraction.
///
/// Extraction failures are scoped to a single document; batch callers log
/// them and continue with the remaining documents.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document could not be read at all.
    #[error("unreadable document: {0}")]
    Document(#[from] XmlError),

    /// The document parsed but carries no invoice content.
    #[error("no invoice data found")]
    NoData,
}

/// Result type for the cpeflow library.
pub type Result<T> = std::result::Result<T, CpeflowError>;
