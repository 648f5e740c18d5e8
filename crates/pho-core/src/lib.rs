//! Pho Core - photo-gallery ingestion library.
//!
//! Turns raw uploaded JPEGs into gallery-ready renditions and catalog entries:
//!
//! ```text
//! upload → pending record → validate → decode → display + thumbnail
//!        → archive original → processed record + catalog image
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use pho_core::{Config, IngestWorker, ScanJob, SqliteStore};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let store = SqliteStore::open(&config.database_path())?;
//!     let mut job = ScanJob::new(IngestWorker::new(&config, store));
//!
//!     let stats = job.run_pending()?;
//!     println!("{} processed, {} failed", stats.succeeded, stats.failed);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod gallery;
pub mod output;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, IngestError, IngestResult, PhoError, Result, StoreError};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{IngestWorker, PathPlanner, ScanJob};
pub use store::{MemoryStore, RecordStore, SqliteStore, StoreTx};
pub use types::{
    AlbumRef, CatalogImage, GalleryEntry, RecordState, RenditionPaths, ScanStats, UploadRecord,
};
pub use upload::Stager;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
