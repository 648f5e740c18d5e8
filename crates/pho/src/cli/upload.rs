//! The `pho upload` command.

use clap::Args;
use pho_core::{Config, Stager, UploadRecord};
use std::path::PathBuf;

use super::OutputFormat;

/// Arguments for the `upload` command.
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Files to stage
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Output format for the created records
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

/// Stage every file, reporting failures without stopping.
pub async fn execute(args: UploadArgs, config: Config) -> anyhow::Result<()> {
    let files: Vec<PathBuf> = args
        .files
        .iter()
        .map(|f| PathBuf::from(shellexpand::tilde(f).into_owned()))
        .collect();

    let (staged, failed) = tokio::task::spawn_blocking(move || {
        let mut store = super::open_store(&config)?;
        let stager = Stager::new(&config);
        let mut staged: Vec<UploadRecord> = Vec::with_capacity(files.len());
        let mut failed = 0usize;
        for file in &files {
            match stager.stage_file(&mut store, file) {
                Ok(record) => {
                    tracing::info!("Staged {}", record.label());
                    staged.push(record);
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!("Failed to stage {}: {}", file.display(), e);
                }
            }
        }
        anyhow::Ok((staged, failed))
    })
    .await??;

    super::print_all(&staged, args.format)?;

    if failed > 0 {
        anyhow::bail!("{failed} file(s) could not be staged");
    }
    Ok(())
}
