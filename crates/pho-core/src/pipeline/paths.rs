//! Storage layout and output path derivation.
//!
//! Every upload maps to three files named after its base name:
//!
//! ```text
//! <root>/orig/<name>        archived original
//! <root>/img/<name>         display rendition (served statically)
//! <root>/img/thumb/<name>   thumbnail
//! <root>/uploads/<uuid>/    staging area for not-yet-processed files
//! ```
//!
//! Two uploads with the same base name map to the same outputs and the later
//! one overwrites the earlier. Rename before ingesting if that matters.

use std::path::{Path, PathBuf};

use crate::types::RenditionPaths;

/// Display renditions, relative to the storage root.
pub const IMAGE_DIR: &str = "img";
/// Thumbnails, relative to the storage root.
pub const THUMB_DIR: &str = "img/thumb";
/// Archived originals, relative to the storage root.
pub const ORIG_DIR: &str = "orig";
/// Upload staging area, relative to the storage root.
pub const UPLOAD_DIR: &str = "uploads";

/// Derives target paths under a storage root.
#[derive(Debug, Clone, Default)]
pub struct PathPlanner {
    root: PathBuf,
}

impl PathPlanner {
    /// Plan paths under `root`. An empty root yields relative paths, and so
    /// does `.`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if root == Path::new(".") {
            return Self::default();
        }
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn image_dir(&self) -> PathBuf {
        self.root.join(IMAGE_DIR)
    }

    pub fn thumb_dir(&self) -> PathBuf {
        self.root.join(THUMB_DIR)
    }

    pub fn orig_dir(&self) -> PathBuf {
        self.root.join(ORIG_DIR)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.root.join(UPLOAD_DIR)
    }

    /// Derive the three output paths from the upload's base name.
    ///
    /// Returns `None` when the path has no file name component.
    pub fn plan(&self, upload_path: &Path) -> Option<RenditionPaths> {
        let file_name = upload_path.file_name()?;
        Some(RenditionPaths {
            orig_path: self.orig_dir().join(file_name),
            display_path: self.image_dir().join(file_name),
            thumb_path: self.thumb_dir().join(file_name),
        })
    }

    /// Create the layout directories if they are missing.
    pub fn ensure_layout(&self) -> std::io::Result<()> {
        for dir in [self.thumb_dir(), self.orig_dir(), self.upload_dir()] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}
