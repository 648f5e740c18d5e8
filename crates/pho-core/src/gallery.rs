//! Gallery projection - what the index page renders.

use crate::error::StoreResult;
use crate::store::RecordStore;
use crate::types::GalleryEntry;

/// Display/thumbnail pairs for every processed record, in store order.
///
/// Pending records never show up; there is nothing to render for them yet.
pub fn collect<S: RecordStore + ?Sized>(store: &S) -> StoreResult<Vec<GalleryEntry>> {
    let entries = store
        .find_processed()?
        .iter()
        .filter_map(|record| record.rendition_paths())
        .map(|paths| GalleryEntry {
            image: paths.display_path.clone(),
            thumb: paths.thumb_path.clone(),
        })
        .collect();
    Ok(entries)
}
