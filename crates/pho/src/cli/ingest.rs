//! The `pho scan` and `pho ingest` commands.
//!
//! Ingestion is blocking work (file I/O, JPEG codec, SQLite), so both run the
//! job on a blocking thread.

use clap::Args;
use pho_core::{Config, IngestWorker, ScanJob, ScanStats, SqliteStore};
use std::path::PathBuf;

use super::OutputFormat;

/// Arguments for the `scan` command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Output format for the scan summary
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

/// Arguments for the `ingest` command.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Directory whose files should be imported
    pub dir: String,

    /// Output format for the import summary
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

pub async fn execute_scan(args: ScanArgs, config: Config) -> anyhow::Result<()> {
    let stats = tokio::task::spawn_blocking(move || -> anyhow::Result<ScanStats> {
        let mut job = build_job(&config)?;
        Ok(job.run_pending()?)
    })
    .await??;

    report(&stats, args.format)
}

pub async fn execute_ingest(args: IngestArgs, config: Config) -> anyhow::Result<()> {
    let dir = PathBuf::from(shellexpand::tilde(&args.dir).into_owned());
    if !dir.is_dir() {
        anyhow::bail!(
            "Not a directory: {:?}\n\n  Hint: `pho ingest` imports every file inside a directory.",
            dir
        );
    }

    let stats = tokio::task::spawn_blocking(move || -> anyhow::Result<ScanStats> {
        let mut job = build_job(&config)?;
        Ok(job.ingest_directory(&dir)?)
    })
    .await??;

    report(&stats, args.format)
}

fn build_job(config: &Config) -> anyhow::Result<ScanJob<SqliteStore>> {
    let store = super::open_store(config)?;
    let worker = IngestWorker::new(config, store);
    worker.planner().ensure_layout()?;
    Ok(ScanJob::new(worker))
}

fn report(stats: &ScanStats, format: OutputFormat) -> anyhow::Result<()> {
    super::print_one(std::io::stdout().lock(), stats, format)?;
    if stats.inconsistent > 0 {
        tracing::warn!(
            "{} record(s) have archived originals but are still pending; reconcile them by hand",
            stats.inconsistent
        );
    }
    Ok(())
}
