//! Core data types for the Pho ingestion pipeline.
//!
//! An upload record is either pending or processed; the two shapes are
//! distinct enum variants so a half-processed record cannot be represented.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// An uploaded image and where it is in the ingestion lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Opaque unique identity
    pub id: Uuid,

    /// Set once, when the upload receiver creates the record
    pub uploaded_at: DateTime<Utc>,

    /// Pending or processed
    #[serde(flatten)]
    pub state: RecordState,
}

/// Lifecycle state of an upload record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RecordState {
    /// Raw file waits at `upload_path` for the ingest worker
    Pending { upload_path: PathBuf },

    /// Renditions exist and the original has been archived
    Processed {
        paths: RenditionPaths,
        processed_at: DateTime<Utc>,
    },
}

/// The three storage locations derived for one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenditionPaths {
    /// Archived original
    pub orig_path: PathBuf,

    /// Display-size rendition
    pub display_path: PathBuf,

    /// Thumbnail rendition
    pub thumb_path: PathBuf,
}

impl UploadRecord {
    /// Create a pending record for a raw file, stamped with the current time.
    pub fn pending(upload_path: impl Into<PathBuf>) -> Self {
        Self::pending_at(upload_path, Utc::now())
    }

    /// Create a pending record with an explicit upload timestamp.
    pub fn pending_at(upload_path: impl Into<PathBuf>, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            uploaded_at,
            state: RecordState::Pending {
                upload_path: upload_path.into(),
            },
        }
    }

    /// The raw file path, if the record is still pending.
    pub fn upload_path(&self) -> Option<&Path> {
        match &self.state {
            RecordState::Pending { upload_path } => Some(upload_path),
            RecordState::Processed { .. } => None,
        }
    }

    /// The rendition paths, if the record has been processed.
    pub fn rendition_paths(&self) -> Option<&RenditionPaths> {
        match &self.state {
            RecordState::Pending { .. } => None,
            RecordState::Processed { paths, .. } => Some(paths),
        }
    }

    /// Completion timestamp; its presence marks the record processed.
    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            RecordState::Pending { .. } => None,
            RecordState::Processed { processed_at, .. } => Some(*processed_at),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, RecordState::Pending { .. })
    }

    /// A copy of this record transitioned to processed.
    pub fn into_processed(self, paths: RenditionPaths, processed_at: DateTime<Utc>) -> Self {
        Self {
            state: RecordState::Processed {
                paths,
                processed_at,
            },
            ..self
        }
    }

    /// A short label for log lines: the upload path while pending, the
    /// archived original afterwards.
    pub fn label(&self) -> String {
        match &self.state {
            RecordState::Pending { upload_path } => upload_path.display().to_string(),
            RecordState::Processed { paths, .. } => paths.orig_path.display().to_string(),
        }
    }
}

/// A named collection that produced images are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: Uuid,
    pub name: String,
    /// URL-safe form of the name
    pub url: String,
}

impl AlbumRef {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            url: slugify(&name),
            name,
        }
    }
}

/// Gallery catalog entry, written in the same transaction that marks its
/// upload record processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogImage {
    pub id: Uuid,
    /// File name of the upload
    pub name: String,
    /// URL-safe slug derived from `name`
    pub url_name: String,
    pub description: String,
    pub album_id: Uuid,
    /// Id of the upload record the renditions belong to
    pub store_id: Uuid,
}

impl CatalogImage {
    /// Catalog entry for a freshly ingested file.
    pub fn for_upload(file_name: &str, album: &AlbumRef, store_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: file_name.to_string(),
            url_name: slugify(file_name),
            description: file_name.to_string(),
            album_id: album.id,
            store_id,
        }
    }
}

/// A display image paired with its thumbnail, for rendering a gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    pub image: PathBuf,
    pub thumb: PathBuf,
}

/// Counters for a scan run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanStats {
    /// Records that reached the processed state
    pub succeeded: usize,

    /// Records that failed and stay pending
    pub failed: usize,

    /// Records whose original was relocated but whose commit failed
    pub inconsistent: usize,

    /// Total scan time in seconds
    pub total_seconds: f64,
}

impl ScanStats {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed + self.inconsistent
    }
}

/// Turn a file name into a URL-safe anchor.
///
/// Letters and digits are kept (lowercased); every run of anything else
/// becomes a single `-`, never leading or trailing.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_paths() -> RenditionPaths {
        RenditionPaths {
            orig_path: PathBuf::from("orig/beach.jpg"),
            display_path: PathBuf::from("img/beach.jpg"),
            thumb_path: PathBuf::from("img/thumb/beach.jpg"),
        }
    }

    #[test]
    fn test_pending_record_shape() {
        let record = UploadRecord::pending("uploads/abc/beach.jpg");
        assert!(record.is_pending());
        assert_eq!(
            record.upload_path(),
            Some(Path::new("uploads/abc/beach.jpg"))
        );
        assert!(record.processed_at().is_none());
        assert!(record.rendition_paths().is_none());
    }

    #[test]
    fn test_into_processed_keeps_identity() {
        let record = UploadRecord::pending("uploads/abc/beach.jpg");
        let id = record.id;
        let uploaded_at = record.uploaded_at;
        let done = record.into_processed(sample_paths(), Utc::now());

        assert_eq!(done.id, id);
        assert_eq!(done.uploaded_at, uploaded_at);
        assert!(done.upload_path().is_none());
        assert_eq!(done.rendition_paths(), Some(&sample_paths()));
        assert!(done.processed_at().unwrap() >= uploaded_at);
    }

    #[test]
    fn test_record_serde_status_tag() {
        let record = UploadRecord::pending("uploads/abc/beach.jpg");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"status\":\"pending\""));
        assert!(json.contains("\"upload_path\":\"uploads/abc/beach.jpg\""));

        let done = record.into_processed(sample_paths(), Utc::now());
        let json = serde_json::to_string(&done).unwrap();
        assert!(json.contains("\"status\":\"processed\""));
        assert!(json.contains("\"thumb_path\":\"img/thumb/beach.jpg\""));
        assert!(!json.contains("upload_path"));

        let parsed: UploadRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, done);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("photo.jpg"), "photo-jpg");
        assert_eq!(slugify("My Photo (1).JPG"), "my-photo-1-jpg");
        assert_eq!(slugify("--edge--case--"), "edge-case");
        assert_eq!(slugify("Zürich_2019.jpeg"), "zürich-2019-jpeg");
        assert_eq!(slugify("..."), "");
    }

    #[test]
    fn test_catalog_image_for_upload() {
        let album = AlbumRef::new("default");
        let store_id = Uuid::new_v4();
        let image = CatalogImage::for_upload("photo.jpg", &album, store_id);
        assert_eq!(image.name, "photo.jpg");
        assert_eq!(image.url_name, "photo-jpg");
        assert_eq!(image.description, "photo.jpg");
        assert_eq!(image.album_id, album.id);
        assert_eq!(image.store_id, store_id);
    }

    #[test]
    fn test_scan_stats_attempted() {
        let stats = ScanStats {
            succeeded: 2,
            failed: 1,
            inconsistent: 1,
            total_seconds: 0.5,
        };
        assert_eq!(stats.attempted(), 4);
    }
}
