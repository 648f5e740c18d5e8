//! Ingestion pipeline components.
//!
//! Stages, in the order the worker runs them:
//! - **validate**: Source exists, fits the size limit, looks like a JPEG
//! - **paths**: Plan display, thumbnail and archive paths from the file name
//! - **codec**: Decode the source and encode renditions as JPEG
//! - **resample**: Aspect-preserving downscale into bounding boxes
//! - **worker**: Runs one record through every stage and commits it
//! - **scan**: Feeds pending records or a directory of files to the worker
//! - **discovery**: Lists the files of a bulk import directory

pub mod codec;
pub mod discovery;
pub mod paths;
pub mod resample;
pub mod scan;
pub mod validate;
pub mod worker;

// Re-exports for convenient access
pub use codec::ImageCodec;
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use paths::PathPlanner;
pub use resample::{fit_dimensions, BoundingBox, Resampler};
pub use scan::ScanJob;
pub use validate::Validator;
pub use worker::IngestWorker;
