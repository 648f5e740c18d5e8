//! Upload staging.
//!
//! Received files land in a fresh `uploads/<uuid>/` directory under their
//! original name and get a pending record. Nothing here touches the rendition
//! or archive paths; that is the worker's job on the next scan.

use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{IngestError, IngestResult};
use crate::pipeline::{PathPlanner, Validator};
use crate::store::RecordStore;
use crate::types::UploadRecord;

/// Stages uploaded files for ingestion.
pub struct Stager {
    planner: PathPlanner,
    validator: Validator,
}

impl Stager {
    pub fn new(config: &Config) -> Self {
        Self {
            planner: PathPlanner::new(config.storage_root()),
            validator: Validator::new(config.limits.clone()),
        }
    }

    /// Stage raw bytes received under `file_name`.
    ///
    /// Only the final component of `file_name` is used, so a client cannot
    /// place the file outside its upload directory.
    pub fn stage_bytes<S: RecordStore + ?Sized>(
        &self,
        store: &mut S,
        file_name: &str,
        bytes: &[u8],
    ) -> IngestResult<UploadRecord> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| IngestError::UnnamedSource(PathBuf::from(file_name)))?;
        self.validator
            .check_size(Path::new(file_name), bytes.len() as u64)?;

        let dir = self.planner.upload_dir().join(Uuid::new_v4().to_string());
        std::fs::create_dir_all(&dir).map_err(|e| IngestError::Io {
            path: dir.clone(),
            source: e,
        })?;
        let dest = dir.join(name);
        if let Err(e) = std::fs::write(&dest, bytes) {
            let _ = std::fs::remove_dir_all(&dir);
            return Err(IngestError::Write {
                path: dest,
                source: e,
            });
        }

        self.save_pending(store, dir, dest)
    }

    /// Stage a file from the local file system. The source is copied, not moved.
    pub fn stage_file<S: RecordStore + ?Sized>(
        &self,
        store: &mut S,
        source: &Path,
    ) -> IngestResult<UploadRecord> {
        if !source.is_file() {
            return Err(IngestError::MissingSource(source.to_path_buf()));
        }
        let len = std::fs::metadata(source)
            .map_err(|e| IngestError::Io {
                path: source.to_path_buf(),
                source: e,
            })?
            .len();
        self.validator.check_size(source, len)?;
        let name = source
            .file_name()
            .ok_or_else(|| IngestError::UnnamedSource(source.to_path_buf()))?;

        let dir = self.planner.upload_dir().join(Uuid::new_v4().to_string());
        std::fs::create_dir_all(&dir).map_err(|e| IngestError::Io {
            path: dir.clone(),
            source: e,
        })?;
        let dest = dir.join(name);
        if let Err(e) = std::fs::copy(source, &dest) {
            let _ = std::fs::remove_dir_all(&dir);
            return Err(IngestError::Write {
                path: dest,
                source: e,
            });
        }

        self.save_pending(store, dir, dest)
    }

    fn save_pending<S: RecordStore + ?Sized>(
        &self,
        store: &mut S,
        dir: PathBuf,
        dest: PathBuf,
    ) -> IngestResult<UploadRecord> {
        let record = UploadRecord::pending(dest);
        if let Err(e) = store.save(&record) {
            let _ = std::fs::remove_dir_all(&dir);
            return Err(e.into());
        }
        tracing::debug!(id = %record.id, "Staged {}", record.label());
        Ok(record)
    }
}
