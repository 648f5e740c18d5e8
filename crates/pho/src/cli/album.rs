//! The `pho album` command.

use clap::{Args, Subcommand};
use pho_core::{Config, RecordStore};

/// Arguments for the `album` command.
#[derive(Args, Debug)]
pub struct AlbumArgs {
    #[command(subcommand)]
    pub command: AlbumCommand,
}

#[derive(Subcommand, Debug)]
pub enum AlbumCommand {
    /// Create an album (no-op if it already exists)
    Add {
        /// Album name
        name: String,
    },
}

pub async fn execute(args: AlbumArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        AlbumCommand::Add { name } => {
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("Album name must not be empty");
            }
            let name = name.to_string();
            let album = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
                let mut store = super::open_store(&config)?;
                Ok(store.create_album(&name)?)
            })
            .await??;
            super::print_one(std::io::stdout().lock(), &album, super::OutputFormat::Json)?;
        }
    }
    Ok(())
}
