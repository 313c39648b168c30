//! Two-phase project-code matching against a registry table.

use tracing::{debug, info};

use super::{ColumnRoles, RegistryTable};
use crate::invoice::rules::identifier::{normalize, variants};

/// Which search phase produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Exact string equality against a trimmed identifier cell.
    Exact,
    /// The variant appeared as a substring of an identifier cell.
    Substring,
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPhase::Exact => write!(f, "exact"),
            MatchPhase::Substring => write!(f, "substring"),
        }
    }
}

/// A successful registry lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMatch {
    /// Project code from the project column of the matching row.
    pub project: String,
    /// The identifier variant that matched.
    pub variant: String,
    /// Phase that produced the match.
    pub phase: MatchPhase,
    /// Zero-based row index of the match.
    pub row: usize,
}

/// Resolve a project code for an invoice identifier.
///
/// The raw identifier is normalized, its variant set generated, and the
/// identifier column searched in two phases: exact equality over every
/// variant first (so an exact hit is never shadowed by a substring hit on
/// another row), then substring containment for registries that embed
/// identifiers in longer composite strings. Variants are tried in sorted
/// order, so resolution is reproducible across runs.
///
/// `None` is a soft miss, not an error: many invoices simply have no
/// registry entry, and callers leave the project field empty.
pub fn find_project_code(
    table: &RegistryTable,
    raw_identifier: &str,
    roles: ColumnRoles,
) -> Option<ProjectMatch> {
    let canonical = normalize(raw_identifier);
    let candidates = variants(&canonical);
    debug!(
        identifier = raw_identifier,
        canonical = %canonical,
        variants = candidates.len(),
        "searching registry"
    );

    for variant in &candidates {
        for (row, cells) in table.rows().iter().enumerate() {
            let cell = cells.get(roles.identifier).map(String::as_str).unwrap_or("");
            if cell.trim() == variant {
                let project = cells
                    .get(roles.project)
                    .map(String::as_str)
                    .unwrap_or("")
                    .trim()
                    .to_string();
                info!(
                    identifier = raw_identifier,
                    variant = %variant,
                    phase = %MatchPhase::Exact,
                    project = %project,
                    row,
                    "project code resolved"
                );
                return Some(ProjectMatch {
                    project,
                    variant: variant.clone(),
                    phase: MatchPhase::Exact,
                    row,
                });
            }
        }
    }

    for variant in &candidates {
        for (row, cells) in table.rows().iter().enumerate() {
            let cell = cells.get(roles.identifier).map(String::as_str).unwrap_or("");
            if cell.contains(variant.as_str()) {
                let project = cells
                    .get(roles.project)
                    .map(String::as_str)
                    .unwrap_or("")
                    .trim()
                    .to_string();
                info!(
                    identifier = raw_identifier,
                    variant = %variant,
                    phase = %MatchPhase::Substring,
                    project = %project,
                    row,
                    "project code resolved"
                );
                return Some(ProjectMatch {
                    project,
                    variant: variant.clone(),
                    phase: MatchPhase::Substring,
                    row,
                });
            }
        }
    }

    info!(identifier = raw_identifier, "no registry entry for identifier");
    None
}
