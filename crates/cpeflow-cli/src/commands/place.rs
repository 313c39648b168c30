//! Place command - file extracted invoices into the organized tree.
//!
//! For every record of the extraction table this verifies the project
//! against the master, locates the comprobante files through the
//! registry-side code, copies them into
//! `Organizado/<cliente>/<empresa>/<proyecto>/<comprobante>/` and pulls
//! matching attachments from shared storage. The records table is written
//! back with the EN MAESTRA column filled in, and a placement log lands
//! next to the tree.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use cpeflow_core::files::organize::{
    alternate_file_code, alternate_registry_code, attachment_search_token, destination_dir,
    expected_file_name, file_code, file_name_variants, registry_code, sanitize_segment,
};
use cpeflow_core::models::invoice::{MASTER_NO, MASTER_OK};
use cpeflow_core::registry::MasterTable;
use cpeflow_core::{detect_columns, FileCategory, InvoiceRecord, RegistryTable};

use super::extract::{read_records_csv, write_records_csv};
use super::load_config;

/// Arguments for the place command.
#[derive(Args)]
pub struct PlaceArgs {
    /// Batch directory (holds the records table and category folders)
    #[arg(required = true)]
    directory: PathBuf,

    /// Records table (default: <directory>/3.file_table_xml.csv)
    #[arg(long)]
    records: Option<PathBuf>,

    /// Master table CSV (default: from configuration)
    #[arg(short, long)]
    master: Option<PathBuf>,

    /// Registry file (default: <directory>/tabla_1.csv)
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Shared documents folder searched for OC/NR attachments
    #[arg(long)]
    shared_documents: Option<PathBuf>,
}

/// One line of the placement log.
struct LogEntry {
    client: String,
    company: String,
    invoice: String,
    searched_code: String,
    destination: String,
    state: String,
}

pub async fn run(args: PlaceArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let records_path = args
        .records
        .clone()
        .unwrap_or_else(|| args.directory.join(&config.extraction.records_file_name));
    let mut records = read_records_csv(&records_path)?;
    if records.is_empty() {
        anyhow::bail!("No records found in {}", records_path.display());
    }

    let master_path = args
        .master
        .clone()
        .unwrap_or_else(|| config.registry.master_path.clone());
    let master = MasterTable::from_csv_path(&master_path)?
        .with_project_column(config.registry.master_project_column);

    let registry_path = args
        .registry
        .clone()
        .unwrap_or_else(|| args.directory.join(&config.registry.file_name));
    // The registry is matched against its literal codes here, no
    // normalization, so the 01-/03- encodings stay distinguishable.
    let table = RegistryTable::from_csv_path(&registry_path, config.registry_delimiter())?;
    let roles = detect_columns(&table, config.registry.sample_rows).roles;

    let shared_documents = args
        .shared_documents
        .clone()
        .unwrap_or_else(|| config.organize.shared_documents_dir.clone());

    let base = args.directory.join(&config.organize.output_dir_name);
    fs::create_dir_all(&base)?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} invoices")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut log = Vec::with_capacity(records.len());
    let mut placed = 0usize;

    for record in &mut records {
        let entry = place_record(
            record,
            &args.directory,
            &base,
            &master,
            &table,
            roles,
            &shared_documents,
            config.organize.search_subdirectories,
        )?;
        if entry.state == "Completado" {
            placed += 1;
        }
        log.push(entry);
        pb.inc(1);
    }
    pb.finish_with_message("Complete");

    write_records_csv(&records_path, &records)?;
    let log_path = base.join("log.csv");
    write_log(&log_path, &log)?;

    println!();
    println!(
        "{} Placed {} of {} invoices under {}",
        style("✓").green(),
        placed,
        records.len(),
        base.display()
    );
    println!(
        "{} Placement log written to {}",
        style("✓").green(),
        log_path.display()
    );

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn place_record(
    record: &mut InvoiceRecord,
    batch_dir: &Path,
    base: &Path,
    master: &MasterTable,
    table: &RegistryTable,
    roles: cpeflow_core::ColumnRoles,
    shared_documents: &Path,
    search_subdirectories: bool,
) -> anyhow::Result<LogEntry> {
    let invoice = record.invoice_number.clone();
    let mut code = file_code(&record.supplier_ruc, &invoice);

    let project = record
        .project
        .as_deref()
        .map(sanitize_segment)
        .unwrap_or_default();
    if project.is_empty() {
        record.in_master = MASTER_NO.to_string();
        debug!(invoice = %invoice, "record has no project");
        return Ok(LogEntry {
            client: record.client.clone(),
            company: record.company.clone(),
            invoice,
            searched_code: code,
            destination: "Proyecto vacío".to_string(),
            state: "No procesado".to_string(),
        });
    }

    if !master.contains_project(&project) {
        record.in_master = MASTER_NO.to_string();
        warn!(invoice = %invoice, project = %project, "project not in master");
        return Ok(LogEntry {
            client: record.client.clone(),
            company: record.company.clone(),
            invoice,
            searched_code: code,
            destination: "No encontrado en maestra".to_string(),
            state: "No procesado".to_string(),
        });
    }
    record.in_master = MASTER_OK.to_string();

    // Locate the registry row through the 01- encoding, then the 03-
    // credit-note encoding. The registry's own project cell names the
    // project folder.
    let mut registry_project = registry_project_for(table, roles, &registry_code(&invoice));
    if registry_project.is_none() {
        registry_project = registry_project_for(table, roles, &alternate_registry_code(&invoice));
        if registry_project.is_some() {
            code = alternate_file_code(&code);
        }
    }

    let Some(folder_project) = registry_project else {
        return Ok(LogEntry {
            client: record.client.clone(),
            company: record.company.clone(),
            invoice,
            searched_code: code,
            destination: "No encontrado".to_string(),
            state: "No encontrado en CSV".to_string(),
        });
    };

    let destination = destination_dir(base, &record.client, &record.company, &folder_project, &invoice);
    fs::create_dir_all(&destination)?;

    let mut copied = copy_comprobante_files(batch_dir, &code, &destination)?;

    if let Some(token) =
        attachment_search_token(&record.client, &invoice, &record.purchase_order)
    {
        copied += copy_attachments(shared_documents, &token, &destination, search_subdirectories)?;
    }
    let reception = record.reception_number.trim();
    if !reception.is_empty() {
        copied += copy_attachments(shared_documents, reception, &destination, search_subdirectories)?;
    }

    info!(invoice = %invoice, files = copied, destination = %destination.display(), "placed");

    Ok(LogEntry {
        client: record.client.clone(),
        company: record.company.clone(),
        invoice,
        searched_code: code,
        destination: destination.display().to_string(),
        state: if copied > 0 {
            "Completado".to_string()
        } else {
            "Faltan archivos".to_string()
        },
    })
}

/// Project cell of the registry row whose identifier cell equals `code`.
fn registry_project_for(
    table: &RegistryTable,
    roles: cpeflow_core::ColumnRoles,
    code: &str,
) -> Option<String> {
    table
        .rows()
        .iter()
        .find(|row| {
            row.get(roles.identifier)
                .map(|cell| cell.trim() == code)
                .unwrap_or(false)
        })
        .and_then(|row| row.get(roles.project))
        .map(|cell| cell.trim().to_string())
        .filter(|project| !project.is_empty())
}

/// Copy the CDR, PDF and XML renditions of a comprobante into the
/// destination, trying the zero-stripped name variant for each folder.
fn copy_comprobante_files(batch_dir: &Path, code: &str, destination: &Path) -> anyhow::Result<usize> {
    let mut copied = 0usize;
    for category in [FileCategory::Cdr, FileCategory::Pdf, FileCategory::Xml] {
        let folder = batch_dir.join(category.folder_name());
        if !folder.is_dir() {
            debug!(folder = %folder.display(), "category folder missing");
            continue;
        }
        for variant in file_name_variants(code) {
            let Some(name) = expected_file_name(&variant, category) else {
                continue;
            };
            let source = folder.join(&name);
            if source.is_file() {
                fs::copy(&source, destination.join(&name))?;
                debug!(file = %name, "copied");
                copied += 1;
                break;
            }
        }
    }
    Ok(copied)
}

/// Copy every shared-storage file whose name contains the token.
fn copy_attachments(
    shared_documents: &Path,
    token: &str,
    destination: &Path,
    search_subdirectories: bool,
) -> anyhow::Result<usize> {
    if !shared_documents.is_dir() {
        debug!(folder = %shared_documents.display(), "shared documents folder missing");
        return Ok(0);
    }

    let pattern = if search_subdirectories {
        shared_documents.join("**").join(format!("*{token}*"))
    } else {
        shared_documents.join(format!("*{token}*"))
    };

    let mut copied = 0usize;
    for path in glob(&pattern.to_string_lossy())?.filter_map(|r| r.ok()) {
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        fs::copy(&path, destination.join(name))?;
        debug!(file = %path.display(), "attachment copied");
        copied += 1;
    }
    Ok(copied)
}

fn write_log(path: &Path, entries: &[LogEntry]) -> anyhow::Result<()> {
    let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Cliente",
        "Empresa",
        "N° Comprobante",
        "Archivo Buscado",
        "Carpeta Destino",
        "Estado",
        "Fecha Registro",
    ])?;
    for entry in entries {
        writer.write_record([
            &entry.client,
            &entry.company,
            &entry.invoice,
            &entry.searched_code,
            &entry.destination,
            &entry.state,
            &stamp,
        ])?;
    }
    writer.flush()?;
    Ok(())
}
