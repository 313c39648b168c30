//! Destination planning for organized comprobante trees.
//!
//! Everything here is pure name and path computation; the CLI does the
//! copying. The organized tree is
//! `<base>/<cliente>/<empresa>/<proyecto>/<comprobante>/` with dots
//! stripped from each segment so client names like "ACME S.A.C." do not
//! produce extension-looking directories.

use std::path::{Path, PathBuf};

use super::FileCategory;

/// File-name stem of a comprobante attachment: `{supplier RUC}-01-{number}`.
pub fn file_code(supplier_ruc: &str, invoice_number: &str) -> String {
    format!("{supplier_ruc}-01-{invoice_number}")
}

/// Credit-note rendition of a file code (`-01-` becomes `-03-`).
pub fn alternate_file_code(code: &str) -> String {
    code.replace("-01-", "-03-")
}

/// Registry-side encoding of an invoice number: `F001-036500` becomes
/// `01-F001--0036500`. Inputs that are not series-number pairs pass
/// through unchanged.
pub fn registry_code(invoice_number: &str) -> String {
    prefixed_registry_code(invoice_number, "01")
}

/// Credit-note rendition of [`registry_code`] (`03-` prefix).
pub fn alternate_registry_code(invoice_number: &str) -> String {
    prefixed_registry_code(invoice_number, "03")
}

fn prefixed_registry_code(invoice_number: &str, prefix: &str) -> String {
    let mut parts = invoice_number.splitn(2, '-');
    match (parts.next(), parts.next()) {
        (Some(series), Some(number)) if !series.is_empty() && !number.contains('-') => {
            format!("{prefix}-{series}--{number:0>7}")
        }
        _ => invoice_number.to_string(),
    }
}

/// Name variants to try when locating a file on disk: the name as given,
/// plus a copy with leading zeros stripped from the final number, since
/// some suppliers name their attachments with the unpadded number.
pub fn file_name_variants(name: &str) -> Vec<String> {
    let mut variants = vec![name.to_string()];
    if let Some((prefix, number)) = name.rsplit_once('-') {
        let stripped = number.trim_start_matches('0');
        let stripped = if stripped.is_empty() { "0" } else { stripped };
        if stripped != number {
            variants.push(format!("{prefix}-{stripped}"));
        }
    }
    variants
}

/// Expected file name for a code variant in a given intake folder.
///
/// Receipts live under their own `R-` prefix and always carry the `.xml`
/// extension; the OTROS folder has no predictable naming.
pub fn expected_file_name(code: &str, category: FileCategory) -> Option<String> {
    match category {
        FileCategory::Cdr => Some(format!("R-{code}.xml")),
        FileCategory::Pdf => Some(format!("{code}.pdf")),
        FileCategory::Xml => Some(format!("{code}.xml")),
        FileCategory::Other => None,
    }
}

/// Token to search shared-documents folders with when pulling extra
/// attachments for an invoice.
///
/// POSITIVA deliveries name their support files `{invoice}_{order}`, so
/// for that client the combined token is used instead of the bare
/// purchase order. No purchase order means no search.
pub fn attachment_search_token(client: &str, invoice_number: &str, purchase_order: &str) -> Option<String> {
    let order = purchase_order.trim();
    if order.is_empty() {
        return None;
    }
    if client.contains("POSITIVA") {
        Some(format!("{invoice_number}_{order}"))
    } else {
        Some(order.to_string())
    }
}

/// Strip characters that break folder names out of a path segment.
pub fn sanitize_segment(segment: &str) -> String {
    segment.replace('.', "").trim().to_string()
}

/// Destination directory for one invoice inside the organized tree.
pub fn destination_dir(
    base: &Path,
    client: &str,
    company: &str,
    project: &str,
    invoice_number: &str,
) -> PathBuf {
    base.join(sanitize_segment(client))
        .join(sanitize_segment(company))
        .join(sanitize_segment(project))
        .join(invoice_number)
}
