//! Invoice record model and the fixed tabular output layout.
//!
//! Column names and order match the spreadsheet the downstream pipeline
//! steps consume, so they stay in Spanish and are never reordered.

use serde::{Deserialize, Serialize};

/// Initial send-flag value carried by every extracted record.
pub const SEND_FLAG_DEFAULT: &str = "NO";

/// Initial processing status carried by every extracted record.
pub const STATUS_UNPROCESSED: &str = "SIN PROCESAR";

/// Master-match flag: the record's project exists in the master registry.
pub const MASTER_OK: &str = "OK";

/// Master-match flag: no master entry (or no project at all).
pub const MASTER_NO: &str = "NO";

/// Output column order for the records table.
pub const HEADERS: [&str; 19] = [
    "Cliente",
    "RUC",
    "Proyecto",
    "Empresa",
    "RUC2",
    "N° de Comprobante",
    "Fecha de Envío",
    "Divisa",
    "Tipo de Impuesto",
    "Condición de pago",
    "Valor Venta",
    "IGV (18%)",
    "TOTAL",
    "OC-OS",
    "Número de Recepción (NR-CR)",
    "Descripción (Primera Fila)",
    "ENVIAR CORREO",
    "ESTADO",
    "EN MAESTRA",
];

/// One extracted invoice.
///
/// All monetary and date fields carry the source document's literal text;
/// the pipeline never does arithmetic on them, it only copies them into the
/// output table. Absent fields stay empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Client (customer party) legal name.
    pub client: String,

    /// Client tax ID (RUC).
    pub client_ruc: String,

    /// Resolved project code, empty when the registry lookup soft-missed.
    pub project: Option<String>,

    /// Supplier legal name.
    pub company: String,

    /// Supplier tax ID (RUC).
    pub supplier_ruc: String,

    /// Invoice identifier as extracted (series + sequence).
    pub invoice_number: String,

    /// Issue date text.
    pub issue_date: String,

    /// Currency note text.
    pub currency: String,

    /// Tax scheme name.
    pub tax_type: String,

    /// Payment-terms text.
    pub payment_terms: String,

    /// Net amount text.
    pub net_amount: String,

    /// Tax amount text.
    pub tax_amount: String,

    /// Total payable text.
    pub total_amount: String,

    /// Purchase-order reference (OC-OS).
    pub purchase_order: String,

    /// Reception-number reference (NR-CR).
    pub reception_number: String,

    /// First line-item description, prefixed with the batch label.
    pub first_line_description: String,

    /// Send flag, initialized to [`SEND_FLAG_DEFAULT`].
    pub send_flag: String,

    /// Processing status, initialized to [`STATUS_UNPROCESSED`].
    pub status: String,

    /// Master-match flag, set by the placement step.
    pub in_master: String,
}

impl InvoiceRecord {
    /// Create an empty record with the fixed initial state.
    pub fn new() -> Self {
        Self {
            client: String::new(),
            client_ruc: String::new(),
            project: None,
            company: String::new(),
            supplier_ruc: String::new(),
            invoice_number: String::new(),
            issue_date: String::new(),
            currency: String::new(),
            tax_type: String::new(),
            payment_terms: String::new(),
            net_amount: String::new(),
            tax_amount: String::new(),
            total_amount: String::new(),
            purchase_order: String::new(),
            reception_number: String::new(),
            first_line_description: String::new(),
            send_flag: SEND_FLAG_DEFAULT.to_string(),
            status: STATUS_UNPROCESSED.to_string(),
            in_master: String::new(),
        }
    }

    /// Values in [`HEADERS`] order, for one output row.
    pub fn to_row(&self) -> [String; 19] {
        [
            self.client.clone(),
            self.client_ruc.clone(),
            self.project.clone().unwrap_or_default(),
            self.company.clone(),
            self.supplier_ruc.clone(),
            self.invoice_number.clone(),
            self.issue_date.clone(),
            self.currency.clone(),
            self.tax_type.clone(),
            self.payment_terms.clone(),
            self.net_amount.clone(),
            self.tax_amount.clone(),
            self.total_amount.clone(),
            self.purchase_order.clone(),
            self.reception_number.clone(),
            self.first_line_description.clone(),
            self.send_flag.clone(),
            self.status.clone(),
            self.in_master.clone(),
        ]
    }

    /// Rebuild a record from a row in [`HEADERS`] order.
    ///
    /// Missing trailing cells (older tables without the master column) read
    /// as empty.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("").to_string();
        let project = cell(2);
        Self {
            client: cell(0),
            client_ruc: cell(1),
            project: if project.is_empty() { None } else { Some(project) },
            company: cell(3),
            supplier_ruc: cell(4),
            invoice_number: cell(5),
            issue_date: cell(6),
            currency: cell(7),
            tax_type: cell(8),
            payment_terms: cell(9),
            net_amount: cell(10),
            tax_amount: cell(11),
            total_amount: cell(12),
            purchase_order: cell(13),
            reception_number: cell(14),
            first_line_description: cell(15),
            send_flag: cell(16),
            status: cell(17),
            in_master: cell(18),
        }
    }
}

impl Default for InvoiceRecord {
    fn default() -> Self {
        Self::new()
    }
}
