//! Pho CLI - photo-gallery ingestion.
//!
//! Uploads are staged as pending records; a scan turns them into a display
//! copy, a thumbnail and an archived original, and files them in the catalog.
//!
//! # Usage
//!
//! ```bash
//! # Create the storage layout, database and default album
//! pho init
//!
//! # Stage files for the next scan
//! pho upload ~/Pictures/beach.jpg ~/Pictures/tower.jpg
//!
//! # Process every pending upload
//! pho scan
//!
//! # Bulk import a directory, stopping at the first bad file
//! pho ingest ./camera-dump
//!
//! # List the gallery
//! pho gallery --format jsonl
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Pho - photo-gallery ingestion pipeline.
#[derive(Parser, Debug)]
#[command(name = "pho")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the platform default
    #[arg(long, global = true, env = "PHO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the storage layout, database schema and ingestion album
    Init,

    /// Stage files as pending uploads
    Upload(cli::upload::UploadArgs),

    /// Process every pending upload, skipping failures
    Scan(cli::ingest::ScanArgs),

    /// Import every file in a directory, stopping at the first failure
    Ingest(cli::ingest::IngestArgs),

    /// List display/thumbnail pairs of processed uploads
    Gallery(cli::gallery::GalleryArgs),

    /// Manage albums
    Album(cli::album::AlbumArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => return Err(e),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e:#}\n  \
                 Using default configuration. Check your config file with `pho config path`."
            );
            pho_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Pho v{}", pho_core::VERSION);

    match cli.command {
        Commands::Init => cli::init::execute(config).await,
        Commands::Upload(args) => cli::upload::execute(args, config).await,
        Commands::Scan(args) => cli::ingest::execute_scan(args, config).await,
        Commands::Ingest(args) => cli::ingest::execute_ingest(args, config).await,
        Commands::Gallery(args) => cli::gallery::execute(args, config).await,
        Commands::Album(args) => cli::album::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, cli.config).await,
    }
}
