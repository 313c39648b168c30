//! Comprobante file classification and destination planning.

pub mod organize;

/// Category of an intake file, decided from its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    /// SUNAT acceptance receipt (`R-*.xml`).
    Cdr,
    /// Printable invoice rendition.
    Pdf,
    /// UBL invoice document.
    Xml,
    /// Anything else that rode along in the delivery.
    Other,
}

impl FileCategory {
    /// Intake folder this category is filed under.
    pub fn folder_name(&self) -> &'static str {
        match self {
            FileCategory::Cdr => "comprobantes_CDR",
            FileCategory::Pdf => "comprobantes_PDF",
            FileCategory::Xml => "comprobantes_XML",
            FileCategory::Other => "comprobantes_OTROS",
        }
    }
}

/// Classify a file name.
///
/// CDR is checked before XML: a receipt is also an `.xml` file, and the
/// `R-` prefix is the only thing that tells them apart. Invoice PDFs and
/// XMLs are recognized by the series marker `F00` somewhere in the name.
pub fn classify(file_name: &str) -> FileCategory {
    let upper = file_name.to_uppercase();
    let lower = file_name.to_lowercase();

    if file_name.starts_with("R-") && lower.ends_with(".xml") {
        FileCategory::Cdr
    } else if upper.contains("F00") && lower.ends_with(".pdf") {
        FileCategory::Pdf
    } else if upper.contains("F00") && lower.ends_with(".xml") {
        FileCategory::Xml
    } else {
        FileCategory::Other
    }
}
