//! Record store: the durable table of upload records, albums and catalog
//! images the pipeline reads from and commits into.
//!
//! Two implementations ship with the crate:
//! - [`SqliteStore`] for real deployments
//! - [`MemoryStore`], an in-memory fake with commit fault injection for tests
//!   and dry runs

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use uuid::Uuid;

use crate::error::StoreResult;
use crate::types::{AlbumRef, CatalogImage, UploadRecord};

/// Durable storage for upload records.
pub trait RecordStore {
    /// Snapshot of every pending record, in the store's natural order.
    /// Never includes processed records.
    fn find_pending(&self) -> StoreResult<Vec<UploadRecord>>;

    /// Every processed record, in the store's natural order.
    fn find_processed(&self) -> StoreResult<Vec<UploadRecord>>;

    /// Look up a record by id.
    fn get(&self, id: Uuid) -> StoreResult<Option<UploadRecord>>;

    /// Insert or replace a record outside any explicit transaction.
    fn save(&mut self, record: &UploadRecord) -> StoreResult<()>;

    /// Resolve an album by name, failing with `AlbumNotFound`.
    fn find_album_by_name(&self, name: &str) -> StoreResult<AlbumRef>;

    /// Create an album, or return the existing one with that name.
    fn create_album(&mut self, name: &str) -> StoreResult<AlbumRef>;

    /// All catalog images.
    fn catalog(&self) -> StoreResult<Vec<CatalogImage>>;

    /// Open a transaction. Dropping it without `commit` rolls it back.
    fn begin(&mut self) -> StoreResult<Box<dyn StoreTx + '_>>;
}

/// An open store transaction.
///
/// `commit` and `rollback` consume the transaction, so a closed transaction
/// cannot be used again. Dropping an uncommitted transaction rolls it back.
pub trait StoreTx {
    /// Insert or replace a record.
    fn save(&mut self, record: &UploadRecord) -> StoreResult<()>;

    /// Insert a catalog image.
    fn insert_image(&mut self, image: &CatalogImage) -> StoreResult<()>;

    /// Make every write in this transaction durable.
    fn commit(self: Box<Self>) -> StoreResult<()>;

    /// Discard every write in this transaction.
    fn rollback(self: Box<Self>) -> StoreResult<()>;
}
