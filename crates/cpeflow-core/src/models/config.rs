//! Configuration structures for the intake pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the cpeflow pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CpeflowConfig {
    /// Registry table configuration.
    pub registry: RegistryConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// File organization configuration.
    pub organize: OrganizeConfig,
}

impl Default for CpeflowConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            extraction: ExtractionConfig::default(),
            organize: OrganizeConfig::default(),
        }
    }
}

/// Lookup-registry and master-registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry file name inside a batch directory.
    pub file_name: String,

    /// Cell delimiter of the registry file.
    pub delimiter: char,

    /// Rows sampled per column during role detection.
    pub sample_rows: usize,

    /// Path to the master registry export.
    pub master_path: PathBuf,

    /// Zero-based column of the master registry holding project codes.
    pub master_project_column: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            file_name: "tabla_1.csv".to_string(),
            delimiter: '|',
            sample_rows: 10,
            master_path: PathBuf::from("Maestra/maestra.csv"),
            master_project_column: 4,
        }
    }
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Subdirectory of a batch directory holding the invoice XMLs.
    pub xml_dir_name: String,

    /// Records table file name written into the batch directory.
    pub records_file_name: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            xml_dir_name: "comprobantes_XML".to_string(),
            records_file_name: "3.file_table_xml.csv".to_string(),
        }
    }
}

/// File organization and placement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizeConfig {
    /// Name of the destination tree created inside a batch directory.
    pub output_dir_name: String,

    /// Shared storage searched for OC/NR attachments.
    pub shared_documents_dir: PathBuf,

    /// Search shared storage recursively.
    pub search_subdirectories: bool,
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            output_dir_name: "Organizado".to_string(),
            shared_documents_dir: PathBuf::from("Documentos de Facturación"),
            search_subdirectories: true,
        }
    }
}

impl CpeflowConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Registry delimiter as a single byte for the CSV reader.
    pub fn registry_delimiter(&self) -> u8 {
        self.registry.delimiter as u8
    }
}
