//! Comprobante identifier normalization and variant generation.
//!
//! The same invoice is written differently across documents and registries:
//! `F001-38941`, `F001-0038941`, `F001--0038941`, `01-F001--0038941` all
//! name one comprobante. Everything is normalized to a single canonical
//! form (`SERIES-NNNNNN`, one hyphen, six digits), and lookups are done
//! against the full set of plausible encodings.

use std::collections::BTreeSet;

use super::patterns::SERIES_NUMBER;

/// Canonicalize an identifier to `SERIES-NNNNNN`.
///
/// Inputs that do not carry the series+number shape pass through trimmed;
/// normalization never fails.
pub fn normalize(raw: &str) -> String {
    let compact = raw.replace("--", "-").replace(' ', "");
    if let Some(caps) = SERIES_NUMBER.captures(compact.trim()) {
        return format!("{}-{:0>6}", &caps[1], significant_digits(&caps[2]));
    }
    raw.trim().to_string()
}

/// Sequence number with leading zeros stripped. String-based so sequence
/// numbers of any width re-pad instead of overflowing an integer parse.
fn significant_digits(number: &str) -> &str {
    let stripped = number.trim_start_matches('0');
    if stripped.is_empty() { "0" } else { stripped }
}

/// All plausible textual encodings of an identifier, plus the input itself.
///
/// For a series+number identifier this is the cross product of
/// {no prefix, `01-`, `03-`} × {`-`, `--`} × {6-digit, 7-digit zero-pad}.
/// Registry lookups iterate the set in its sorted order so matching stays
/// reproducible across runs. Non-matching input yields a singleton set.
pub fn variants(identifier: &str) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    set.insert(identifier.trim().to_string());

    if let Some(caps) = SERIES_NUMBER.captures(identifier.trim()) {
        let series = caps[1].to_string();
        let digits = significant_digits(&caps[2]);
        let pads = [format!("{digits:0>6}"), format!("{digits:0>7}")];
        for prefix in ["", "01-", "03-"] {
            for hyphen in ["-", "--"] {
                for pad in &pads {
                    set.insert(format!("{prefix}{series}{hyphen}{pad}"));
                }
            }
        }
    }

    set
}
