//! Reception-number (NR) and purchase-order (OC) reference extraction.
//!
//! Reference data is inconsistently placed by document producers, so each
//! helper works over one candidate text source and the extractor cascades
//! them in a fixed order until one yields a match.

use super::patterns::{NR_DELIMITED, NR_FALLBACK, NR_PRIMARY, OC_REFERENCE};

/// Undo the URL-encoded brackets some producers leave in free text.
pub fn clean_encoded_text(text: &str) -> String {
    text.replace("%5D", "]").replace("%5B", "[")
}

/// Reception number from a primary source (item description).
pub fn reception_from_primary(text: &str) -> Option<String> {
    let clean = clean_encoded_text(text);
    NR_PRIMARY
        .captures(&clean)
        .or_else(|| NR_DELIMITED.captures(&clean))
        .map(|caps| caps[1].to_string())
}

/// Reception number from a fallback source (order reference, notes).
pub fn reception_from_fallback(text: &str) -> Option<String> {
    let clean = clean_encoded_text(text);
    NR_FALLBACK
        .captures(&clean)
        .or_else(|| NR_DELIMITED.captures(&clean))
        .map(|caps| caps[1].to_string())
}

/// Purchase-order reference from an item description.
pub fn purchase_order(text: &str) -> Option<String> {
    let clean = clean_encoded_text(text);
    OC_REFERENCE.captures(&clean).map(|caps| caps[1].to_string())
}
