//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `img/`, `img/thumb/`, `orig/` and `uploads/`.
    /// Empty means the working directory, with stored paths kept relative.
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
        }
    }
}

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file (supports `~`)
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "~/.pho/pho.db".to_string(),
        }
    }
}

/// Bounding boxes for the two renditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenditionConfig {
    /// Display rendition max width
    pub display_width: u32,

    /// Display rendition max height
    pub display_height: u32,

    /// Thumbnail max width
    pub thumb_width: u32,

    /// Thumbnail max height
    pub thumb_height: u32,
}

impl Default for RenditionConfig {
    fn default() -> Self {
        Self {
            display_width: 960,
            display_height: 720,
            thumb_width: 348,
            thumb_height: 464,
        }
    }
}

/// JPEG codec settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Encoder quality, 1-100
    pub jpeg_quality: u8,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { jpeg_quality: 75 }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum upload size in megabytes
    pub max_file_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
        }
    }
}

/// Ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Album every ingested image is filed under. Must exist in the store.
    pub album: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            album: "default".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
