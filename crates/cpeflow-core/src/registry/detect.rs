//! Heuristic column-role detection for registry tables.
//!
//! Registries carry no reliable headers, so the identifier and project
//! columns are found by sampling cell values against shape patterns.
//! Detection runs once per table load; the resulting indices are passed
//! explicitly to every lookup against that load.

use tracing::{debug, warn};

use super::RegistryTable;
use crate::invoice::rules::patterns::{IDENTIFIER_CELL, PROJECT_CELL};

/// Fallback identifier column when no column qualifies.
pub const DEFAULT_IDENTIFIER_COLUMN: usize = 0;

/// Fallback project column when no column qualifies.
pub const DEFAULT_PROJECT_COLUMN: usize = 3;

/// The two column indices every lookup needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRoles {
    /// Column holding comprobante identifiers.
    pub identifier: usize,
    /// Column holding project codes.
    pub project: usize,
}

/// Sample tallies for one column, kept for operator-facing logs.
#[derive(Debug, Clone, Copy)]
pub struct ColumnReport {
    /// Zero-based column index.
    pub column: usize,
    /// Non-empty cells sampled.
    pub sampled: usize,
    /// Sampled cells matching the identifier pattern.
    pub identifier_hits: usize,
    /// Sampled cells matching the project pattern.
    pub project_hits: usize,
}

/// Result of one detection run.
#[derive(Debug, Clone)]
pub struct ColumnDetection {
    /// Detected (or defaulted) column roles.
    pub roles: ColumnRoles,
    /// Whether the identifier column was detected rather than defaulted.
    pub identifier_detected: bool,
    /// Whether the project column was detected rather than defaulted.
    pub project_detected: bool,
    /// Per-column sample tallies.
    pub reports: Vec<ColumnReport>,
}

/// Infer which columns hold identifiers and project codes.
///
/// The presumed header row is skipped. Per column, up to `sample_rows`
/// non-empty cells are tested against the identifier and project shapes;
/// a column qualifies for a role when strictly more than half of its
/// sampled values match, and the first qualifying column (ascending index)
/// wins. A role nobody qualifies for falls back to its default index so
/// the batch stays operable on malformed registries.
pub fn detect_columns(table: &RegistryTable, sample_rows: usize) -> ColumnDetection {
    let mut identifier_column = None;
    let mut project_column = None;
    let mut reports = Vec::new();

    for column in 0..table.width() {
        let mut sampled = 0usize;
        let mut identifier_hits = 0usize;
        let mut project_hits = 0usize;

        for row in table.rows().iter().skip(1) {
            if sampled == sample_rows {
                break;
            }
            let value = row.get(column).map(String::as_str).unwrap_or("").trim();
            if value.is_empty() {
                continue;
            }
            sampled += 1;
            if IDENTIFIER_CELL.is_match(value) {
                identifier_hits += 1;
            }
            if PROJECT_CELL.is_match(value) {
                project_hits += 1;
            }
        }

        debug!(
            column,
            sampled, identifier_hits, project_hits, "column sample tally"
        );
        reports.push(ColumnReport {
            column,
            sampled,
            identifier_hits,
            project_hits,
        });

        if sampled > 0 && identifier_hits * 2 > sampled && identifier_column.is_none() {
            debug!(column, "identifier column detected");
            identifier_column = Some(column);
        }
        if sampled > 0 && project_hits * 2 > sampled && project_column.is_none() {
            debug!(column, "project column detected");
            project_column = Some(column);
        }
    }

    if identifier_column.is_none() {
        warn!(
            default = DEFAULT_IDENTIFIER_COLUMN,
            "no identifier column qualified, using default"
        );
    }
    if project_column.is_none() {
        warn!(
            default = DEFAULT_PROJECT_COLUMN,
            "no project column qualified, using default"
        );
    }

    ColumnDetection {
        roles: ColumnRoles {
            identifier: identifier_column.unwrap_or(DEFAULT_IDENTIFIER_COLUMN),
            project: project_column.unwrap_or(DEFAULT_PROJECT_COLUMN),
        },
        identifier_detected: identifier_column.is_some(),
        project_detected: project_column.is_some(),
        reports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(rows: &[&[&str]]) -> RegistryTable {
        RegistryTable::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_detects_both_roles() {
        let mut rows: Vec<Vec<String>> = vec![vec![
            "CLIENTE".into(),
            "RUC".into(),
            "COMPROBANTE".into(),
            "PROYECTO".into(),
        ]];
        for i in 0..10 {
            rows.push(vec![
                "ACME".into(),
                "20123456789".into(),
                format!("F001-{:06}", 38000 + i),
                format!("PRJ{:03}", i),
            ]);
        }
        let detection = detect_columns(&RegistryTable::new(rows), 10);
        assert_eq!(
            detection.roles,
            ColumnRoles {
                identifier: 2,
                project: 3
            }
        );
        assert!(detection.identifier_detected);
        assert!(detection.project_detected);
    }

    #[test]
    fn test_majority_threshold() {
        // Column 2: 8 of 10 sampled values are 6-char alphanumeric codes.
        let mut rows: Vec<Vec<String>> = vec![vec!["A".into(), "B".into(), "C".into()]];
        for i in 0..8 {
            rows.push(vec!["x".into(), "y".into(), format!("PRJ{:03}", i)]);
        }
        rows.push(vec!["x".into(), "y".into(), "NO-MATCH-1".into()]);
        rows.push(vec!["x".into(), "y".into(), "NO-MATCH-2".into()]);
        let detection = detect_columns(&RegistryTable::new(rows), 10);
        assert_eq!(detection.roles.project, 2);
        // Nothing qualified as an identifier column.
        assert_eq!(detection.roles.identifier, DEFAULT_IDENTIFIER_COLUMN);
        assert!(!detection.identifier_detected);
    }

    #[test]
    fn test_exact_half_does_not_qualify() {
        let mut rows: Vec<Vec<String>> = vec![vec!["C".into()]];
        for i in 0..5 {
            rows.push(vec![format!("PRJ{:03}", i)]);
        }
        for _ in 0..5 {
            rows.push(vec!["not-a-code".into()]);
        }
        let detection = detect_columns(&RegistryTable::new(rows), 10);
        assert!(!detection.project_detected);
    }

    #[test]
    fn test_first_qualifying_column_wins() {
        let mut rows: Vec<Vec<String>> = vec![vec!["A".into(), "B".into()]];
        for i in 0..4 {
            rows.push(vec![format!("AAA{:03}", i), format!("BBB{:03}", i)]);
        }
        let detection = detect_columns(&RegistryTable::new(rows), 10);
        assert_eq!(detection.roles.project, 0);
    }

    #[test]
    fn test_empty_table_falls_back_to_defaults() {
        let detection = detect_columns(&table(&[]), 10);
        assert_eq!(
            detection.roles,
            ColumnRoles {
                identifier: DEFAULT_IDENTIFIER_COLUMN,
                project: DEFAULT_PROJECT_COLUMN
            }
        );
        assert!(!detection.identifier_detected);
        assert!(!detection.project_detected);
    }

    #[test]
    fn test_all_non_matching_falls_back() {
        let detection = detect_columns(
            &table(&[
                &["header", "header"],
                &["free text", "more text"],
                &["free text", "more text"],
            ]),
            10,
        );
        assert_eq!(detection.roles.identifier, 0);
        assert_eq!(detection.roles.project, 3);
    }

    #[test]
    fn test_empty_cells_do_not_count_against_majority() {
        let mut rows: Vec<Vec<String>> = vec![vec!["C".into()]];
        // 3 matches among 4 non-empty samples, with plenty of blanks mixed in.
        rows.push(vec!["PRJ001".into()]);
        rows.push(vec!["".into()]);
        rows.push(vec!["PRJ002".into()]);
        rows.push(vec!["".into()]);
        rows.push(vec!["PRJ003".into()]);
        rows.push(vec!["blank!!".into()]);
        rows.push(vec!["".into()]);
        let detection = detect_columns(&RegistryTable::new(rows), 10);
        assert!(detection.project_detected);
        assert_eq!(detection.roles.project, 0);
    }
}
