//! Field extraction from parsed UBL invoices.
//!
//! Every field is best-effort: a missing element leaves the record field
//! empty rather than failing the document, because suppliers fill UBL
//! unevenly and a partial row is still worth writing. Only an unreadable
//! or contentless document is an error.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::invoice::rules;
use crate::models::invoice::InvoiceRecord;
use crate::registry::{find_project_code, ColumnRoles, RegistryTable};
use crate::xml::{UblDocument, XmlNode};

/// Extracts [`InvoiceRecord`]s from UBL invoice XML.
///
/// Optionally wired to a registry so each record's project code is
/// resolved from the invoice number during extraction.
pub struct InvoiceExtractor<'a> {
    registry: Option<(&'a RegistryTable, ColumnRoles)>,
    batch_label: String,
}

impl<'a> InvoiceExtractor<'a> {
    pub fn new() -> Self {
        Self {
            registry: None,
            batch_label: String::new(),
        }
    }

    /// Resolve project codes against a registry during extraction.
    pub fn with_registry(mut self, table: &'a RegistryTable, roles: ColumnRoles) -> Self {
        self.registry = Some((table, roles));
        self
    }

    /// Label prepended to the first-line description, typically the name
    /// of the inbox directory the batch came from.
    pub fn with_batch_label(mut self, label: impl Into<String>) -> Self {
        self.batch_label = label.into();
        self
    }

    /// Extract a record from a file on disk.
    ///
    /// Supplier files are occasionally Latin-1 rather than UTF-8, so the
    /// bytes are decoded lossily instead of rejected.
    pub fn extract_from_path(&self, path: &Path) -> crate::Result<InvoiceRecord> {
        let bytes = std::fs::read(path)?;
        let xml = String::from_utf8_lossy(&bytes);
        Ok(self.extract_from_str(&xml)?)
    }

    /// Extract a record from XML text.
    pub fn extract_from_str(&self, xml: &str) -> Result<InvoiceRecord, ExtractionError> {
        let document = UblDocument::parse(xml)?;
        let root = document.root();
        if root.children.is_empty() {
            return Err(ExtractionError::NoData);
        }

        let mut record = InvoiceRecord::new();

        record.client = root
            .find_path(&["AccountingCustomerParty", "Party"])
            .and_then(|party| party.find_path(&["PartyLegalEntity", "RegistrationName"]))
            .map(|n| n.content().to_string())
            .unwrap_or_default();
        record.client_ruc = text_at(root, &["AccountingCustomerParty", "Party", "PartyIdentification", "ID"]);
        record.company = text_at(root, &["AccountingSupplierParty", "Party", "PartyLegalEntity", "RegistrationName"]);
        record.supplier_ruc = text_at(root, &["AccountingSupplierParty", "Party", "PartyIdentification", "ID"]);

        record.invoice_number = root
            .child("ID")
            .map(|n| n.content().to_string())
            .unwrap_or_default();
        record.issue_date = root
            .child("IssueDate")
            .map(|n| n.content().to_string())
            .unwrap_or_default();

        // The currency rides in a spelled-out-amount note, not in a
        // currency code element.
        record.currency = root
            .children_named("Note")
            .find(|n| n.attr("languageLocaleID") == Some("1000"))
            .map(|n| n.content().to_string())
            .unwrap_or_default();

        record.tax_type = text_at(root, &["TaxSubtotal", "TaxCategory", "TaxScheme", "Name"]);
        record.payment_terms = payment_terms(root);

        let monetary_total = root.descendants("LegalMonetaryTotal").into_iter().next();
        record.net_amount = monetary_total
            .and_then(|t| t.child("LineExtensionAmount"))
            .map(|n| n.content().to_string())
            .unwrap_or_default();
        record.tax_amount = text_at(root, &["TaxTotal", "TaxAmount"]);
        record.total_amount = monetary_total
            .and_then(|t| t.child("PayableAmount"))
            .map(|n| n.content().to_string())
            .unwrap_or_default();

        record.reception_number = reception_number(root).unwrap_or_default();
        record.purchase_order = purchase_order(root).unwrap_or_default();
        record.first_line_description = self.first_line_description(root);

        if record.invoice_number.is_empty() {
            warn!("document has no invoice number");
        } else if let Some((table, roles)) = self.registry {
            let canonical = rules::normalize(&record.invoice_number);
            record.project = find_project_code(table, &canonical, roles).map(|m| m.project);
            if record.project.is_none() {
                debug!(invoice = %record.invoice_number, "invoice has no project");
            }
        }

        Ok(record)
    }

    fn first_line_description(&self, root: &XmlNode) -> String {
        let description = root
            .descendants("InvoiceLine")
            .first()
            .and_then(|line| line.find_path(&["Item", "Description"]))
            .map(|n| n.content().to_string())
            .unwrap_or_default();
        if self.batch_label.is_empty() {
            description
        } else {
            format!("{}-{}", self.batch_label, description)
        }
    }
}

impl Default for InvoiceExtractor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn text_at(root: &XmlNode, path: &[&str]) -> String {
    root.find_path(path)
        .map(|n| n.content().to_string())
        .unwrap_or_default()
}

/// Payment terms note, preferring the `languageID="L"` note and falling
/// back to `PaymentTerms/Note`. Either way the text must mention "DIAS";
/// other notes on these elements are free-form remarks.
fn payment_terms(root: &XmlNode) -> String {
    if let Some(note) = root
        .descendants("Note")
        .into_iter()
        .find(|n| n.attr("languageID") == Some("L"))
    {
        if note.content().to_uppercase().contains("DIAS") {
            return note.content().to_string();
        }
    }
    if let Some(note) = root.find_path(&["PaymentTerms", "Note"]) {
        if note.content().to_uppercase().contains("DIAS") {
            return note.content().to_string();
        }
    }
    String::new()
}

/// Reception number (NR-CR) cascade: the first item description with the
/// loose pattern, then the order reference, then every note, both with
/// the strict pattern.
fn reception_number(root: &XmlNode) -> Option<String> {
    if let Some(description) = root.find_path(&["Item", "Description"]) {
        if let Some(nr) = rules::reception_from_primary(description.content()) {
            return Some(nr);
        }
    }

    if let Some(reference) = root.find_path(&["OrderReference", "ID"]) {
        if let Some(nr) = rules::reception_from_fallback(reference.content()) {
            return Some(nr);
        }
    }

    root.descendants("Note")
        .into_iter()
        .find_map(|note| rules::reception_from_fallback(note.content()))
}

/// Purchase order from the first item description that carries one.
fn purchase_order(root: &XmlNode) -> Option<String> {
    root.find_path_all(&["Item", "Description"])
        .into_iter()
        .find_map(|description| rules::purchase_order(description.content()))
}
