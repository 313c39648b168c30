//! Master folder-structure table.
//!
//! The master is the curated list of projects whose invoices get a managed
//! folder tree. It is a plain CSV export with a header row; only the
//! project column matters for membership checks, the rest of the row is
//! routing metadata carried along for reporting.

use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::RegistryError;

/// A row of the master table that matched a project lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterRow {
    /// Zero-based data row index (header excluded).
    pub index: usize,
    /// Project code as stored, trimmed.
    pub project: String,
    /// Full cell row.
    pub cells: Vec<String>,
}

/// The master table loaded into memory.
#[derive(Debug, Clone)]
pub struct MasterTable {
    rows: Vec<Vec<String>>,
    project_column: usize,
}

impl MasterTable {
    /// Column index of the project code in the standard master layout
    /// (Cliente, RUC cliente, Sociedad, RUC sociedad, Proyecto, ...).
    pub const DEFAULT_PROJECT_COLUMN: usize = 4;

    /// Load the master from a comma-delimited CSV file with a header row.
    pub fn from_csv_path(path: &Path) -> Result<Self, RegistryError> {
        if !path.exists() {
            return Err(RegistryError::NotFound(path.display().to_string()));
        }
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        if table.rows.is_empty() {
            return Err(RegistryError::Empty(path.display().to_string()));
        }
        debug!(path = %path.display(), rows = table.rows.len(), "master table loaded");
        Ok(table)
    }

    /// Load the master from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RegistryError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self {
            rows,
            project_column: Self::DEFAULT_PROJECT_COLUMN,
        })
    }

    /// Override the project column for non-standard exports.
    pub fn with_project_column(mut self, column: usize) -> Self {
        self.project_column = column;
        self
    }

    /// Data rows (header excluded).
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn project_cell(&self, row: &[String]) -> String {
        row.get(self.project_column)
            .map(|c| c.trim().to_string())
            .unwrap_or_default()
    }

    /// Look up a project code.
    ///
    /// Case-insensitive exact comparison first; if nothing matches, retry
    /// with substring containment since some master entries carry a suffix
    /// after the bare code.
    pub fn find_project(&self, code: &str) -> Option<MasterRow> {
        let needle = code.trim().to_uppercase();
        if needle.is_empty() {
            return None;
        }

        for (index, row) in self.rows.iter().enumerate() {
            let project = self.project_cell(row);
            if project.to_uppercase() == needle {
                return Some(MasterRow {
                    index,
                    project,
                    cells: row.clone(),
                });
            }
        }

        for (index, row) in self.rows.iter().enumerate() {
            let project = self.project_cell(row);
            if project.to_uppercase().contains(&needle) {
                return Some(MasterRow {
                    index,
                    project,
                    cells: row.clone(),
                });
            }
        }

        warn!(code, "project not present in master");
        None
    }

    /// Whether a project code is present (exact or partial).
    pub fn contains_project(&self, code: &str) -> bool {
        self.find_project(code).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MASTER_CSV: &str = "\
Cliente,RUC Cliente,Sociedad,RUC Sociedad,Proyecto,Tipo,Fecha,Destinatarios,Adjuntos
ACME SAC,20123456789,Constructora Sur,20555555551,PRJ001,Factura,2025-01-01,acme@example.com,PDF
BETA EIRL,20987654321,Constructora Sur,20555555551,PRJ002-FASE2,Factura,2025-01-01,beta@example.com,XML
POSITIVA,20333333333,Servicios Norte,20555555552,prj777,Factura,2025-01-01,pos@example.com,PDF
";

    fn master() -> MasterTable {
        MasterTable::from_reader(MASTER_CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_exact_lookup_is_case_insensitive() {
        let hit = master().find_project("prj001").unwrap();
        assert_eq!(hit.project, "PRJ001");
        assert_eq!(hit.cells[0], "ACME SAC");
        let hit = master().find_project("PRJ777").unwrap();
        assert_eq!(hit.project, "prj777");
    }

    #[test]
    fn test_partial_lookup_when_master_carries_suffix() {
        let hit = master().find_project("PRJ002").unwrap();
        assert_eq!(hit.project, "PRJ002-FASE2");
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn test_absent_project() {
        assert!(master().find_project("PRJ999").is_none());
        assert!(!master().contains_project("PRJ999"));
        assert!(master().contains_project("PRJ001"));
    }

    #[test]
    fn test_empty_code_never_matches() {
        // An empty needle would substring-match every row.
        assert!(master().find_project("").is_none());
        assert!(master().find_project("   ").is_none());
    }

    #[test]
    fn test_custom_project_column() {
        let csv = "Proyecto,Cliente\nPRJ005,ACME\n";
        let table = MasterTable::from_reader(csv.as_bytes())
            .unwrap()
            .with_project_column(0);
        assert!(table.contains_project("PRJ005"));
    }

    #[test]
    fn test_missing_file_is_structural() {
        let err = MasterTable::from_csv_path(Path::new("/nonexistent/maestra.csv")).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }
}
