//! In-memory record store.

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::types::{AlbumRef, CatalogImage, UploadRecord};

use super::{RecordStore, StoreTx};

/// Keeps everything in insertion-ordered vectors.
///
/// `fail_commits` makes every subsequent transaction commit fail, which is how
/// the relocate-then-commit window gets exercised in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<UploadRecord>,
    albums: Vec<AlbumRef>,
    images: Vec<CatalogImage>,
    fail_commits: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds an album with the given name.
    pub fn with_album(name: &str) -> Self {
        let mut store = Self::new();
        store.albums.push(AlbumRef::new(name));
        store
    }

    /// Make every commit from now on fail (or succeed again).
    pub fn fail_commits(&mut self, fail: bool) {
        self.fail_commits = fail;
    }

    /// All records, pending and processed, in insertion order.
    pub fn records(&self) -> &[UploadRecord] {
        &self.records
    }

    fn upsert(records: &mut Vec<UploadRecord>, record: &UploadRecord) {
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
    }
}

impl RecordStore for MemoryStore {
    fn find_pending(&self) -> StoreResult<Vec<UploadRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.is_pending())
            .cloned()
            .collect())
    }

    fn find_processed(&self) -> StoreResult<Vec<UploadRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| !r.is_pending())
            .cloned()
            .collect())
    }

    fn get(&self, id: Uuid) -> StoreResult<Option<UploadRecord>> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    fn save(&mut self, record: &UploadRecord) -> StoreResult<()> {
        Self::upsert(&mut self.records, record);
        Ok(())
    }

    fn find_album_by_name(&self, name: &str) -> StoreResult<AlbumRef> {
        self.albums
            .iter()
            .find(|a| a.name == name)
            .cloned()
            .ok_or_else(|| StoreError::AlbumNotFound(name.to_string()))
    }

    fn create_album(&mut self, name: &str) -> StoreResult<AlbumRef> {
        if let Ok(existing) = self.find_album_by_name(name) {
            return Ok(existing);
        }
        let album = AlbumRef::new(name);
        self.albums.push(album.clone());
        Ok(album)
    }

    fn catalog(&self) -> StoreResult<Vec<CatalogImage>> {
        Ok(self.images.clone())
    }

    fn begin(&mut self) -> StoreResult<Box<dyn StoreTx + '_>> {
        Ok(Box::new(MemoryTx {
            store: self,
            records: Vec::new(),
            images: Vec::new(),
        }))
    }
}

/// Buffers writes until commit; dropping it discards them.
struct MemoryTx<'a> {
    store: &'a mut MemoryStore,
    records: Vec<UploadRecord>,
    images: Vec<CatalogImage>,
}

impl StoreTx for MemoryTx<'_> {
    fn save(&mut self, record: &UploadRecord) -> StoreResult<()> {
        MemoryStore::upsert(&mut self.records, record);
        Ok(())
    }

    fn insert_image(&mut self, image: &CatalogImage) -> StoreResult<()> {
        self.images.push(image.clone());
        Ok(())
    }

    fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTx {
            store,
            records,
            images,
        } = *self;
        if store.fail_commits {
            return Err(StoreError::Backend("commit failed (injected)".into()));
        }
        for record in &records {
            MemoryStore::upsert(&mut store.records, record);
        }
        store.images.extend(images);
        Ok(())
    }

    fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}
