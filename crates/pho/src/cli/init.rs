//! The `pho init` command.

use pho_core::{AlbumRef, Config, PathPlanner, RecordStore};

/// Create the storage layout, the database and the ingestion album.
///
/// Safe to run again: existing directories, tables and the album are kept.
pub async fn execute(config: Config) -> anyhow::Result<()> {
    let (planner, album) = tokio::task::spawn_blocking(move || setup(&config)).await??;
    tracing::info!("Album {:?} ready ({})", album.name, album.id);

    let root = match planner.root() {
        root if root.as_os_str().is_empty() => std::path::Path::new("."),
        root => root,
    };
    println!("Initialized gallery at {}", root.display());
    Ok(())
}

fn setup(config: &Config) -> anyhow::Result<(PathPlanner, AlbumRef)> {
    let planner = PathPlanner::new(config.storage_root());
    planner.ensure_layout()?;
    tracing::info!("Storage layout ready under {:?}", planner.root());

    let mut store = super::open_store(config)?;
    let album = store.create_album(&config.ingest.album)?;
    tracing::info!("Database ready at {}", config.database_path().display());
    Ok((planner, album))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.root = dir.path().join("gallery");
        config.database.path = dir.path().join("db/pho.db").to_string_lossy().into_owned();

        let (planner, first) = setup(&config).unwrap();
        assert!(planner.thumb_dir().is_dir());
        assert!(planner.orig_dir().is_dir());

        let (_, second) = setup(&config).unwrap();
        assert_eq!(first.id, second.id);
    }
}
