//! Scan jobs - feed records to the ingest worker.
//!
//! Two modes with different failure policies:
//! - [`ScanJob::run_pending`] is the recurring background scan. It must make
//!   progress despite bad uploads, so per-record failures are logged and
//!   skipped.
//! - [`ScanJob::ingest_directory`] is an operator-run bulk import. The first
//!   failure stops it so the offending file can be inspected.

use std::path::Path;
use std::time::Instant;

use crate::error::IngestResult;
use crate::store::RecordStore;
use crate::types::{ScanStats, UploadRecord};

use super::discovery::FileDiscovery;
use super::worker::IngestWorker;

/// Runs the ingest worker over a batch of records.
pub struct ScanJob<S> {
    worker: IngestWorker<S>,
    discovery: FileDiscovery,
}

impl<S: RecordStore> ScanJob<S> {
    pub fn new(worker: IngestWorker<S>) -> Self {
        Self {
            worker,
            discovery: FileDiscovery::new(),
        }
    }

    pub fn worker(&self) -> &IngestWorker<S> {
        &self.worker
    }

    pub fn into_worker(self) -> IngestWorker<S> {
        self.worker
    }

    /// Process every record that was pending when the scan started.
    ///
    /// Records created while the scan runs wait for the next one. Returns an
    /// error only if the pending query fails or a record hits a fatal error
    /// (the ingestion album is missing).
    pub fn run_pending(&mut self) -> IngestResult<ScanStats> {
        let start = Instant::now();
        let pending = self.worker.store().find_pending()?;
        tracing::info!("Found {} pending upload(s)", pending.len());

        let mut stats = ScanStats::default();
        for record in &pending {
            match self.worker.process_one(record) {
                Ok(_) => stats.succeeded += 1,
                Err(e) if e.is_fatal() => {
                    tracing::error!("Aborting scan: {}", e);
                    return Err(e);
                }
                Err(e) if e.needs_reconciliation() => {
                    stats.inconsistent += 1;
                    tracing::warn!("Inconsistent after ingesting {}: {}", record.label(), e);
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::error!("Error ingesting {}: {}", record.label(), e);
                }
            }
        }

        stats.total_seconds = start.elapsed().as_secs_f64();
        log_summary(&stats);
        Ok(stats)
    }

    /// Ingest every file directly inside `dir`, stopping at the first error.
    ///
    /// Each file gets a freshly synthesized pending record; nothing needs to
    /// exist in the store beforehand. Files are moved out of `dir` into the
    /// archive as they are processed.
    pub fn ingest_directory(&mut self, dir: &Path) -> IngestResult<ScanStats> {
        let start = Instant::now();
        let files = self.discovery.list(dir)?;
        tracing::info!(
            "Found {} file(s) to ingest in {:?} ({} bytes)",
            files.len(),
            dir,
            FileDiscovery::total_size(&files)
        );

        let mut stats = ScanStats::default();
        for file in &files {
            tracing::info!("Processing {}...", file.path.display());
            let record = UploadRecord::pending(&file.path);
            if let Err(e) = self.worker.process_one(&record) {
                tracing::error!(
                    "Stopping import after {} file(s): {}",
                    stats.succeeded,
                    e
                );
                return Err(e);
            }
            stats.succeeded += 1;
        }

        stats.total_seconds = start.elapsed().as_secs_f64();
        log_summary(&stats);
        Ok(stats)
    }
}

fn log_summary(stats: &ScanStats) {
    tracing::info!(
        "Scan finished in {:.1}s: {} succeeded, {} failed, {} inconsistent",
        stats.total_seconds,
        stats.succeeded,
        stats.failed,
        stats.inconsistent
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use crate::store::MemoryStore;
    use crate::testing::{test_config, write_jpeg};
    use std::path::PathBuf;

    fn job(root: &Path, store: MemoryStore) -> ScanJob<MemoryStore> {
        let worker = IngestWorker::new(&test_config(root), store);
        worker.planner().ensure_layout().unwrap();
        ScanJob::new(worker)
    }

    /// a.jpg and c.jpg are valid JPEGs, b.jpg is not an image.
    fn three_files(dir: &Path) -> [PathBuf; 3] {
        std::fs::create_dir_all(dir).unwrap();
        let a = dir.join("a.jpg");
        let b = dir.join("b.jpg");
        let c = dir.join("c.jpg");
        write_jpeg(&a, 800, 600);
        std::fs::write(&b, b"this is not a jpeg").unwrap();
        write_jpeg(&c, 600, 800);
        [a, b, c]
    }

    #[test]
    fn test_run_pending_skips_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let mut store = MemoryStore::with_album("default");
        let files = three_files(&root.join("uploads/batch"));
        let records: Vec<_> = files.iter().map(UploadRecord::pending).collect();
        for r in &records {
            store.save(r).unwrap();
        }

        let mut job = job(root, store);
        let stats = job.run_pending().unwrap();
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.inconsistent, 0);

        let store = job.worker().store();
        assert!(!store.get(records[0].id).unwrap().unwrap().is_pending());
        assert!(store.get(records[1].id).unwrap().unwrap().is_pending());
        assert!(!store.get(records[2].id).unwrap().unwrap().is_pending());
        assert!(files[1].is_file());
        assert!(root.join("orig/a.jpg").is_file());
        assert!(root.join("orig/c.jpg").is_file());
    }

    #[test]
    fn test_run_pending_again_only_sees_failures() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let mut store = MemoryStore::with_album("default");
        for path in three_files(&root.join("uploads/batch")) {
            store.save(&UploadRecord::pending(path)).unwrap();
        }

        let mut job = job(root, store);
        job.run_pending().unwrap();
        let second = job.run_pending().unwrap();
        assert_eq!(second.succeeded, 0);
        assert_eq!(second.failed, 1);
        assert_eq!(second.attempted(), 1);
    }

    #[test]
    fn test_run_pending_aborts_without_album() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let mut store = MemoryStore::new();
        let files = three_files(&root.join("uploads/batch"));
        for path in &files {
            store.save(&UploadRecord::pending(path)).unwrap();
        }

        let mut job = job(root, store);
        let err = job.run_pending().unwrap_err();
        assert!(matches!(err, IngestError::AlbumNotFound(_)));
        assert!(files.iter().all(|f| f.is_file()));
        assert_eq!(job.worker().store().find_pending().unwrap().len(), 3);
    }

    #[test]
    fn test_run_pending_counts_inconsistent_records() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let mut store = MemoryStore::with_album("default");
        store.fail_commits(true);
        let upload = root.join("uploads/x/a.jpg");
        std::fs::create_dir_all(upload.parent().unwrap()).unwrap();
        write_jpeg(&upload, 320, 240);
        store.save(&UploadRecord::pending(&upload)).unwrap();

        let mut job = job(root, store);
        let stats = job.run_pending().unwrap();
        assert_eq!(stats.inconsistent, 1);
        assert_eq!(stats.succeeded, 0);
        assert!(root.join("orig/a.jpg").is_file());
    }

    #[test]
    fn test_run_pending_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = job(dir.path(), MemoryStore::with_album("default"));
        let stats = job.run_pending().unwrap();
        assert_eq!(stats.attempted(), 0);
    }

    #[test]
    fn test_ingest_directory_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let import = root.join("import");
        let files = three_files(&import);

        let mut job = job(root, MemoryStore::with_album("default"));
        let err = job.ingest_directory(&import).unwrap_err();
        assert!(matches!(err, IngestError::Decode { .. }));

        // a.jpg went through, b.jpg stopped the import, c.jpg was never touched.
        assert!(root.join("orig/a.jpg").is_file());
        assert!(!files[0].exists());
        assert!(files[1].is_file());
        assert!(files[2].is_file());
        assert!(!root.join("img/c.jpg").exists());

        let store = job.worker().store();
        assert_eq!(store.records().len(), 1);
        assert_eq!(store.catalog().unwrap()[0].name, "a.jpg");
    }

    #[test]
    fn test_ingest_directory_processes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let import = root.join("import");
        std::fs::create_dir_all(import.join("skipped-subdir")).unwrap();
        write_jpeg(&import.join("one.jpg"), 1200, 900);
        write_jpeg(&import.join("two.jpg"), 300, 300);

        let mut job = job(root, MemoryStore::with_album("default"));
        let stats = job.ingest_directory(&import).unwrap();
        assert_eq!(stats.succeeded, 2);

        let store = job.into_worker().into_store();
        assert!(store.find_pending().unwrap().is_empty());
        assert_eq!(store.find_processed().unwrap().len(), 2);
        assert!(import.join("skipped-subdir").is_dir());
    }

    #[test]
    fn test_ingest_directory_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = job(dir.path(), MemoryStore::with_album("default"));
        let err = job
            .ingest_directory(&dir.path().join("does-not-exist"))
            .unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
