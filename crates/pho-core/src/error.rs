//! Error types for the Pho ingestion pipeline.
//!
//! Errors are organized by layer so a failure names the file, the stage and
//! the underlying cause. Ingestion errors additionally classify themselves:
//! most are per-record and the scan moves on, a few are fatal for the whole
//! run, and one marks the relocated-but-uncommitted window that needs an
//! operator.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for Pho operations.
#[derive(Error, Debug)]
pub enum PhoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Ingestion pipeline errors
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Record store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Record store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite failure
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No album with the requested name
    #[error("Album not found: {0:?}")]
    AlbumNotFound(String),

    /// A persisted row is neither a valid pending nor a valid processed record
    #[error("Corrupt record {id}: {message}")]
    Corrupt { id: String, message: String },

    /// Any other backend failure
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Ingestion errors, organized by pipeline stage.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The record's upload file is gone; left untouched for inspection
    #[error("Source file missing: {0}")]
    MissingSource(PathBuf),

    /// The record has already been processed
    #[error("Record {0} is not pending")]
    NotPending(Uuid),

    /// The upload path has no file name to derive outputs from
    #[error("Upload path has no file name: {0}")]
    UnnamedSource(PathBuf),

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Source is not a well-formed JPEG
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Rendition could not be encoded
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Rendition could not be written to its target path
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a file or listing a directory failed
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The album images are filed under does not exist
    #[error("Album {0:?} does not exist; create it before ingesting")]
    AlbumNotFound(String),

    /// Store failure before anything irreversible happened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Moving the original into the archive failed; record still pending
    #[error("Failed to relocate {from} to {to}: {source}")]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Original was relocated but the record could not be committed
    #[error("Original moved to {orig_path} but record {id} was not committed: {source}")]
    Consistency {
        id: Uuid,
        orig_path: PathBuf,
        #[source]
        source: StoreError,
    },
}

impl IngestError {
    /// Errors that make every further record fail the same way.
    pub fn is_fatal(&self) -> bool {
        matches!(self, IngestError::AlbumNotFound(_))
    }

    /// True when the file system and the store disagree and an operator has
    /// to reconcile them by hand.
    pub fn needs_reconciliation(&self) -> bool {
        matches!(self, IngestError::Consistency { .. })
    }
}

/// Convenience type alias for Pho results.
pub type Result<T> = std::result::Result<T, PhoError>;

/// Convenience type alias for ingestion results.
pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Convenience type alias for store results.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
