//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.renditions;
        if r.display_width == 0 || r.display_height == 0 {
            return Err(ConfigError::ValidationError(
                "renditions.display_width and display_height must be > 0".into(),
            ));
        }
        if r.thumb_width == 0 || r.thumb_height == 0 {
            return Err(ConfigError::ValidationError(
                "renditions.thumb_width and thumb_height must be > 0".into(),
            ));
        }
        if self.codec.jpeg_quality == 0 || self.codec.jpeg_quality > 100 {
            return Err(ConfigError::ValidationError(
                "codec.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.ingest.album.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "ingest.album must not be empty".into(),
            ));
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.path must not be empty".into(),
            ));
        }
        Ok(())
    }
}
