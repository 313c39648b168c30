//! Common regex patterns for comprobante extraction and registry matching.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Series + sequence number (F001-38941, F001-0038941, ...)
    pub static ref SERIES_NUMBER: Regex = Regex::new(
        r"^([A-Z]\d{3})-(\d+)"
    ).unwrap();

    // Registry cell shapes: F001-038923, 01-F001--0389237, F003--0003600
    pub static ref IDENTIFIER_CELL: Regex = Regex::new(
        r"^([A-Z]\d{3}-\d{6}|\d{2}-[A-Z0-9]{1,4}--?\d{6,7}|[A-Z]\d{3}--\d{7})$"
    ).unwrap();

    // Project codes are exactly 6 alphanumeric characters
    pub static ref PROJECT_CELL: Regex = Regex::new(
        r"^[A-Za-z0-9]{6}$"
    ).unwrap();

    // Reception number (NR) in item descriptions. Producers write the label
    // with assorted punctuation, so the separator class is loose here.
    pub static ref NR_PRIMARY: Regex = Regex::new(
        r"(?:NR[:#._\s]*|N[°º]?\s*NR[:#._\s]*|Nro\.?\s*NR[:#._\s]*|Numero\s*(?:de)?\s*Recepcion\s*(?:N[°º]?)?\s*)(\d{1,15}(?:-\d{1,10})?)"
    ).unwrap();

    // Reception number in order references and notes; stricter separator.
    pub static ref NR_FALLBACK: Regex = Regex::new(
        r"(?:NR[:\s]\s*|N[°º]?\s*NR[:\s]\s*|Nro\.?\s*NR[:\s]\s*|Numero\s*(?:de)?\s*Recepcion\s*(?:N[°º]?)?\s*)(\d{1,15}(?:-\d{1,10})?)"
    ).unwrap();

    // Reception number written after a slash or bar delimiter.
    pub static ref NR_DELIMITED: Regex = Regex::new(
        r"[/|]\s*NR\s*[:|=]?\s*(\d{1,15}(?:-\d{1,10})?)"
    ).unwrap();

    // Purchase order (OC) reference.
    pub static ref OC_REFERENCE: Regex = Regex::new(
        r"(?:OC\s+|Orden de compra\s+(?:N[°º]?\s*)?)(\w{3,12}(?:-\w{4})?)"
    ).unwrap();
}
