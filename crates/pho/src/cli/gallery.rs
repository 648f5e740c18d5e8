//! The `pho gallery` command.

use anyhow::Context;
use clap::Args;
use pho_core::{gallery, Config, OutputWriter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use super::OutputFormat;

/// Arguments for the `gallery` command.
#[derive(Args, Debug)]
pub struct GalleryArgs {
    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

pub async fn execute(args: GalleryArgs, config: Config) -> anyhow::Result<()> {
    let entries = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let store = super::open_store(&config)?;
        Ok(gallery::collect(&store)?)
    })
    .await??;
    tracing::debug!("{} gallery entries", entries.len());

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Cannot create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = OutputWriter::new(out, args.format.into(), true);
    writer.write_all(&entries)?;
    writer.flush()?;

    if let Some(path) = &args.output {
        tracing::info!("Wrote {} entries to {}", writer.items_written(), path.display());
    }
    Ok(())
}
