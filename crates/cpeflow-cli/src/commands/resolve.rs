//! Resolve command - look up the project code for one identifier.

use std::path::PathBuf;

use clap::Args;
use console::style;

use cpeflow_core::invoice::rules::{normalize, variants};
use cpeflow_core::registry::MasterTable;
use cpeflow_core::{detect_columns, find_project_code, RegistryTable};

use super::load_config;

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// Invoice identifier (any accepted form, e.g. F001-38941)
    #[arg(required = true)]
    identifier: String,

    /// Registry file
    #[arg(short, long, required = true)]
    registry: PathBuf,

    /// Also check the resolved project against the master table
    #[arg(short, long)]
    master: Option<PathBuf>,

    /// Print the generated search variants
    #[arg(long)]
    show_variants: bool,
}

pub async fn run(args: ResolveArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let mut table = RegistryTable::from_csv_path(&args.registry, config.registry_delimiter())?;
    let detection = detect_columns(&table, config.registry.sample_rows);
    let roles = detection.roles;
    table.normalize_column(roles.identifier);

    let canonical = normalize(&args.identifier);
    println!("Identifier: {} (canonical: {})", args.identifier, canonical);
    println!(
        "Registry: {} rows, identifier column {}, project column {}",
        table.len(),
        roles.identifier,
        roles.project
    );

    if args.show_variants {
        println!("Variants:");
        for variant in variants(&canonical) {
            println!("  {}", variant);
        }
    }

    // A miss is a legitimate outcome, not a failure.
    let Some(found) = find_project_code(&table, &args.identifier, roles) else {
        println!("{} No registry entry found", style("✗").red());
        return Ok(());
    };

    println!(
        "{} Project: {} (matched {} via {} match, row {})",
        style("✓").green(),
        style(&found.project).bold(),
        found.variant,
        found.phase,
        found.row
    );

    if let Some(master_path) = &args.master {
        let master = MasterTable::from_csv_path(master_path)?
            .with_project_column(config.registry.master_project_column);
        match master.find_project(&found.project) {
            Some(row) => println!(
                "{} In master: {} ({})",
                style("✓").green(),
                row.project,
                row.cells.first().map(String::as_str).unwrap_or("")
            ),
            None => println!("{} Not in master", style("✗").yellow()),
        }
    }

    Ok(())
}
