//! Ingest worker - takes one pending upload record to processed.
//!
//! ```text
//! validate → resolve album → plan paths → decode → resample ×2
//!          → encode + write ×2 → rename original → commit record + catalog
//! ```
//!
//! Everything before the rename can fail and leave the record pending with its
//! source file in place, so the next scan simply tries again. The rename is the
//! point of no return: if the commit after it fails, the original already sits
//! in `orig/` while the store still says pending. That case is reported as
//! [`IngestError::Consistency`] and left for an operator; re-running it would
//! only produce `MissingSource`.

use chrono::Utc;
use image::{DynamicImage, GenericImageView};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::error::{IngestError, IngestResult, StoreError, StoreResult};
use crate::store::RecordStore;
use crate::types::{AlbumRef, CatalogImage, UploadRecord};

use super::codec::ImageCodec;
use super::paths::PathPlanner;
use super::resample::Resampler;
use super::validate::Validator;

/// Processes upload records one at a time against an injected store.
pub struct IngestWorker<S> {
    store: S,
    planner: PathPlanner,
    validator: Validator,
    codec: ImageCodec,
    resampler: Resampler,
    album: String,
}

impl<S: RecordStore> IngestWorker<S> {
    /// Create a worker from configuration and the store it commits into.
    pub fn new(config: &Config, store: S) -> Self {
        Self {
            store,
            planner: PathPlanner::new(config.storage_root()),
            validator: Validator::new(config.limits.clone()),
            codec: ImageCodec::new(config.codec.clone()),
            resampler: Resampler::new(&config.renditions),
            album: config.ingest.album.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn planner(&self) -> &PathPlanner {
        &self.planner
    }

    /// Run one pending record through the pipeline.
    ///
    /// On success the returned record is the processed version that was
    /// committed. On any error the stored record is left as it was.
    pub fn process_one(&mut self, record: &UploadRecord) -> IngestResult<UploadRecord> {
        let start = Instant::now();
        let upload_path = record
            .upload_path()
            .ok_or(IngestError::NotPending(record.id))?;
        tracing::debug!("Processing: {:?}", upload_path);

        // Preconditions
        self.validator.validate(upload_path)?;
        let album = self.resolve_album()?;
        let paths = self
            .planner
            .plan(upload_path)
            .ok_or_else(|| IngestError::UnnamedSource(upload_path.to_path_buf()))?;
        let file_name = upload_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::trace!("  Validate: {:?}", start.elapsed());

        // Decode
        let decode_start = Instant::now();
        let bytes = std::fs::read(upload_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IngestError::MissingSource(upload_path.to_path_buf()),
            _ => IngestError::Io {
                path: upload_path.to_path_buf(),
                source: e,
            },
        })?;
        let original = self.codec.decode(&bytes, upload_path)?;
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        // Resample
        let resample_start = Instant::now();
        let display = self.resampler.display(&original);
        let thumb = self.resampler.thumbnail(&original);
        tracing::trace!("  Resample: {:?}", resample_start.elapsed());

        // Encode and write; a failure here leaves partial outputs behind, which
        // the next attempt overwrites.
        let write_start = Instant::now();
        self.write_rendition(&display, &paths.display_path)?;
        self.write_rendition(&thumb, &paths.thumb_path)?;
        tracing::trace!("  Write: {:?}", write_start.elapsed());

        // Relocate
        std::fs::rename(upload_path, &paths.orig_path).map_err(|e| IngestError::Relocate {
            from: upload_path.to_path_buf(),
            to: paths.orig_path.clone(),
            source: e,
        })?;

        // Commit
        let orig_path = paths.orig_path.clone();
        // Never earlier than the upload, even if the clock stepped back.
        let processed_at = Utc::now().max(record.uploaded_at);
        let processed = record.clone().into_processed(paths, processed_at);
        let image = CatalogImage::for_upload(&file_name, &album, record.id);
        if let Err(source) = self.commit(&processed, &image) {
            tracing::warn!(
                id = %record.id,
                orig = %orig_path.display(),
                "Original relocated but commit failed; record needs manual reconciliation: {}",
                source
            );
            return Err(IngestError::Consistency {
                id: record.id,
                orig_path,
                source,
            });
        }

        let (width, height) = original.dimensions();
        tracing::debug!(
            "Processed {:?} in {:?} ({}x{})",
            file_name,
            start.elapsed(),
            width,
            height
        );
        Ok(processed)
    }

    fn resolve_album(&self) -> IngestResult<AlbumRef> {
        self.store
            .find_album_by_name(&self.album)
            .map_err(|e| match e {
                StoreError::AlbumNotFound(name) => IngestError::AlbumNotFound(name),
                other => IngestError::Store(other),
            })
    }

    fn write_rendition(&self, image: &DynamicImage, path: &Path) -> IngestResult<()> {
        let bytes = self.codec.encode(image, path)?;
        std::fs::write(path, bytes).map_err(|e| IngestError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Persist the processed record and its catalog entry atomically. Any early
    /// return drops the transaction, which rolls it back.
    fn commit(&mut self, record: &UploadRecord, image: &CatalogImage) -> StoreResult<()> {
        let mut tx = self.store.begin()?;
        tx.save(record)?;
        tx.insert_image(image)?;
        tx.commit()
    }
}
