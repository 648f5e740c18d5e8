//! File discovery for directory-driven ingestion.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{IngestError, IngestResult};

/// Lists candidate files in an import directory.
#[derive(Debug, Default)]
pub struct FileDiscovery;

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self
    }

    /// List the non-directory entries directly inside `dir`.
    ///
    /// Subdirectories are not descended into. No extension filtering happens
    /// here; files that are not JPEGs fail later at decode. Any listing error
    /// is returned rather than skipped, since an import should not silently
    /// miss files.
    pub fn list(&self, dir: &Path) -> IngestResult<Vec<DiscoveredFile>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                IngestError::Io {
                    path,
                    source: e.into(),
                }
            })?;
            if entry.file_type().is_dir() {
                continue;
            }
            let meta = entry.metadata().map_err(|e| IngestError::Io {
                path: entry.path().to_path_buf(),
                source: e.into(),
            })?;
            files.push(DiscoveredFile {
                path: entry.path().to_path_buf(),
                size: meta.len(),
            });
        }

        // Sort by path for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}
