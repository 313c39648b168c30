//! Organize command - sort intake files into category folders.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::{debug, info};

use cpeflow_core::{classify, FileCategory};

/// Arguments for the organize command.
#[derive(Args)]
pub struct OrganizeArgs {
    /// Batch directory holding the downloaded comprobante files
    #[arg(required = true)]
    directory: PathBuf,

    /// Report what would be moved without touching anything
    #[arg(long)]
    dry_run: bool,
}

/// Batch bookkeeping files that ride along with the download and must
/// not be filed as comprobantes.
fn is_intake_artifact(name: &str) -> bool {
    name.starts_with('.')
        || name.starts_with("contenido_email")
        || name.starts_with("tabla_")
        || name.starts_with("debug_")
        || name.ends_with(".log")
        || name.ends_with(".txt")
}

pub async fn run(args: OrganizeArgs, _config_path: Option<&str>) -> anyhow::Result<()> {
    if !args.directory.is_dir() {
        anyhow::bail!("Not a directory: {}", args.directory.display());
    }

    let mut counts = [0usize; 4];
    let mut skipped = 0usize;

    for entry in fs::read_dir(&args.directory)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_intake_artifact(&name) {
            debug!(file = %name, "skipping intake artifact");
            skipped += 1;
            continue;
        }

        let category = classify(&name);
        let slot = match category {
            FileCategory::Cdr => 0,
            FileCategory::Pdf => 1,
            FileCategory::Xml => 2,
            FileCategory::Other => 3,
        };
        counts[slot] += 1;

        let target_dir = args.directory.join(category.folder_name());
        let target = target_dir.join(&name);

        if args.dry_run {
            println!("{} -> {}", name, category.folder_name());
            continue;
        }

        fs::create_dir_all(&target_dir)?;
        move_file(&path, &target)?;
        info!(file = %name, folder = category.folder_name(), "filed");
    }

    println!(
        "{} Filed {} CDR, {} PDF, {} XML, {} other ({} skipped)",
        style("✓").green(),
        counts[0],
        counts[1],
        counts[2],
        counts[3],
        skipped
    );

    Ok(())
}

/// Rename where possible, copy-and-delete across filesystems.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
