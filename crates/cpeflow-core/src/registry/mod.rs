//! Registry tables: loading, column-role detection, and project matching.

pub mod detect;
pub mod master;
pub mod matcher;

pub use detect::{detect_columns, ColumnDetection, ColumnReport, ColumnRoles};
pub use master::MasterTable;
pub use matcher::{find_project_code, MatchPhase, ProjectMatch};

use std::io::Read;
use std::path::Path;

use crate::error::RegistryError;
use crate::invoice::rules::identifier::normalize;

/// A loaded registry: rows of string cells with no header semantics.
///
/// Registries arrive as delimited exports of unknown shape; which column
/// holds identifiers and which holds project codes is inferred per load
/// (see [`detect_columns`]) and threaded explicitly into every lookup.
#[derive(Debug, Clone)]
pub struct RegistryTable {
    rows: Vec<Vec<String>>,
}

impl RegistryTable {
    /// Build a table from in-memory rows.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Load a delimited registry file.
    ///
    /// Rows may be ragged; short rows read as empty cells. A missing or
    /// empty file is a structural failure that stops the batch.
    pub fn from_csv_path(path: &Path, delimiter: u8) -> Result<Self, RegistryError> {
        if !path.exists() {
            return Err(RegistryError::NotFound(path.display().to_string()));
        }
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file, delimiter)?;
        if table.is_empty() {
            return Err(RegistryError::Empty(path.display().to_string()));
        }
        Ok(table)
    }

    /// Load a delimited registry from any reader.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, RegistryError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { rows })
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row length.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell value, empty for out-of-range coordinates.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Canonicalize every cell of one column with identifier normalization.
    ///
    /// Run on the detected identifier column before matching so canonical
    /// query variants hit registries that store padded or double-hyphen
    /// encodings.
    pub fn normalize_column(&mut self, column: usize) {
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(column) {
                *cell = normalize(cell);
            }
        }
    }
}
