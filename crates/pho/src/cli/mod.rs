//! Command implementations.

pub mod album;
pub mod config;
pub mod gallery;
pub mod ingest;
pub mod init;
pub mod upload;

use anyhow::Context;
use clap::ValueEnum;
use pho_core::output::OutputFormat as CoreOutputFormat;
use pho_core::{Config, OutputWriter, SqliteStore};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Supported output formats.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object or array
    #[default]
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Load the config file given on the command line, or the default one.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::load()?),
    }
}

/// Open the configured record store, creating its schema if needed.
pub fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    let path = config.database_path();
    SqliteStore::open(&path).with_context(|| {
        format!(
            "Failed to open database at {}\n\n  Hint: Run `pho init` first.",
            path.display()
        )
    })
}

/// Write `items` to stdout as a JSON array or as JSON lines.
pub fn print_all<T: Serialize>(items: &[T], format: OutputFormat) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut writer = OutputWriter::new(stdout.lock(), format.into(), true);
    writer.write_all(items)?;
    writer.flush()?;
    Ok(())
}

/// Write a single item to `out`.
pub fn print_one<T: Serialize, W: Write>(
    out: W,
    item: &T,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut writer = OutputWriter::new(out, format.into(), true);
    writer.write(item)?;
    writer.flush()?;
    Ok(())
}
