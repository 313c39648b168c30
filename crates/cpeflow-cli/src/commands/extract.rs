//! Extract command - read a batch of UBL XMLs into a records table.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use cpeflow_core::models::invoice::HEADERS;
use cpeflow_core::{detect_columns, InvoiceExtractor, InvoiceRecord, RegistryTable};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Batch directory (holds the registry file and the XML folder)
    #[arg(required = true)]
    directory: PathBuf,

    /// Registry file (default: <directory>/tabla_1.csv)
    #[arg(short, long)]
    registry: Option<PathBuf>,

    /// Output records file (default: <directory>/3.file_table_xml.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Abort the batch on the first document that fails to extract
    #[arg(long)]
    fail_fast: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Records table as CSV
    Csv,
    /// Records as a JSON array
    Json,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let registry_path = args
        .registry
        .clone()
        .unwrap_or_else(|| args.directory.join(&config.registry.file_name));

    let mut table = RegistryTable::from_csv_path(&registry_path, config.registry_delimiter())?;
    let detection = detect_columns(&table, config.registry.sample_rows);
    let roles = detection.roles;
    table.normalize_column(roles.identifier);
    debug!(
        identifier = roles.identifier,
        project = roles.project,
        rows = table.len(),
        "registry ready"
    );

    let xml_dir = args.directory.join(&config.extraction.xml_dir_name);
    let pattern = xml_dir.join("*.xml");
    let files: Vec<PathBuf> = glob(&pattern.to_string_lossy())?
        .filter_map(|r| r.ok())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No XML files found in {}", xml_dir.display());
    }

    println!(
        "{} Found {} invoice documents",
        style("ℹ").blue(),
        files.len()
    );

    let batch_label = args
        .directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extractor = InvoiceExtractor::new()
        .with_registry(&table, roles)
        .with_batch_label(batch_label);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut records: Vec<InvoiceRecord> = Vec::with_capacity(files.len());
    let mut failures = 0usize;

    for path in &files {
        match extractor.extract_from_path(path) {
            Ok(record) => records.push(record),
            Err(e) => {
                // A bad document only costs its own row.
                failures += 1;
                if args.fail_fast {
                    error!("Failed to extract {}: {}", path.display(), e);
                    anyhow::bail!("Extraction failed: {}", e);
                }
                warn!("Failed to extract {}: {}", path.display(), e);
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Complete");

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.directory.join(&config.extraction.records_file_name));

    match args.format {
        OutputFormat::Csv => write_records_csv(&output_path, &records)?,
        OutputFormat::Json => {
            std::fs::write(&output_path, serde_json::to_string_pretty(&records)?)?
        }
    }

    let matched = records.iter().filter(|r| r.project.is_some()).count();
    println!();
    println!(
        "{} Extracted {} invoices in {:?} ({} with project, {} without, {} failed)",
        style("✓").green(),
        records.len(),
        start.elapsed(),
        matched,
        records.len() - matched,
        failures
    );
    println!(
        "{} Records written to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// Write the records table with the fixed header row.
pub fn write_records_csv(path: &std::path::Path, records: &[InvoiceRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADERS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a records table written by [`write_records_csv`].
pub fn read_records_csv(path: &std::path::Path) -> anyhow::Result<Vec<InvoiceRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cells: Vec<String> = row.iter().map(str::to_string).collect();
        records.push(InvoiceRecord::from_row(&cells));
    }
    Ok(records)
}
