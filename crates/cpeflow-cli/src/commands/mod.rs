//! Subcommand implementations.

pub mod config;
pub mod extract;
pub mod organize;
pub mod place;
pub mod resolve;

use std::path::Path;

use cpeflow_core::CpeflowConfig;

/// Load the configuration from an explicit path or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CpeflowConfig> {
    match config_path {
        Some(path) => Ok(CpeflowConfig::from_file(Path::new(path))?),
        None => Ok(CpeflowConfig::default()),
    }
}
