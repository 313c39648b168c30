//! CLI application for the comprobante intake pipeline.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, extract, organize, place, resolve};

/// Comprobante intake - extract, match and file Peruvian UBL invoices
#[derive(Parser)]
#[command(name = "cpeflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sort intake files into the comprobante category folders
    Organize(organize::OrganizeArgs),

    /// Extract invoice records from a batch of UBL XML files
    Extract(extract::ExtractArgs),

    /// File extracted invoices into the organized folder tree
    Place(place::PlaceArgs),

    /// Resolve the project code for a single invoice identifier
    Resolve(resolve::ResolveArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Organize(args) => organize::run(args, cli.config.as_deref()).await,
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Place(args) => place::run(args, cli.config.as_deref()).await,
        Commands::Resolve(args) => resolve::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args).await,
    }
}
