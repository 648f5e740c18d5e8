//! Input validation before decoding.

use std::io::Read;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::IngestError;

/// Validates source files before processing.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Maximum accepted file size in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.limits.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Perform quick validation before full decode.
    ///
    /// Checks:
    /// - File exists and is a regular file
    /// - File size is within limits
    /// - File starts with the JPEG start-of-image marker
    pub fn validate(&self, path: &Path) -> Result<(), IngestError> {
        if !path.is_file() {
            return Err(IngestError::MissingSource(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| IngestError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.check_size(path, metadata.len())?;

        self.check_magic_bytes(path)?;

        Ok(())
    }

    /// Reject files larger than the configured limit.
    pub fn check_size(&self, path: &Path, len: u64) -> Result<(), IngestError> {
        if len > self.max_bytes() {
            return Err(IngestError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: len / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }
        Ok(())
    }

    fn check_magic_bytes(&self, path: &Path) -> Result<(), IngestError> {
        let mut file = std::fs::File::open(path).map_err(|e| IngestError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut header = [0u8; 3];
        let bytes_read = file.read(&mut header).unwrap_or(0);

        if !Self::is_jpeg_header(&header[..bytes_read]) {
            return Err(IngestError::Decode {
                path: path.to_path_buf(),
                message: "Not a JPEG file (missing start-of-image marker)".to_string(),
            });
        }

        Ok(())
    }

    /// JPEG: FF D8 FF
    fn is_jpeg_header(header: &[u8]) -> bool {
        header.len() >= 3 && header[0] == 0xFF && header[1] == 0xD8 && header[2] == 0xFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_bytes_jpeg() {
        assert!(Validator::is_jpeg_header(&[0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn test_magic_bytes_png_rejected() {
        assert!(!Validator::is_jpeg_header(&[0x89, b'P', b'N']));
    }

    #[test]
    fn test_magic_bytes_short_rejected() {
        assert!(!Validator::is_jpeg_header(&[0xFF, 0xD8]));
        assert!(!Validator::is_jpeg_header(&[]));
    }

    #[test]
    fn test_validate_missing_file() {
        let validator = Validator::new(LimitsConfig::default());
        let err = validator
            .validate(Path::new("/nonexistent/pho/photo.jpg"))
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingSource(_)));
    }

    #[test]
    fn test_validate_directory_is_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let validator = Validator::new(LimitsConfig::default());
        let err = validator.validate(dir.path()).unwrap_err();
        assert!(matches!(err, IngestError::MissingSource(_)));
    }

    #[test]
    fn test_validate_non_jpeg_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.jpg");
        std::fs::write(&path, b"hello").unwrap();

        let validator = Validator::new(LimitsConfig::default());
        let err = validator.validate(&path).unwrap_err();
        assert!(matches!(err, IngestError::Decode { .. }));
    }

    #[test]
    fn test_check_size_limit() {
        let validator = Validator::new(LimitsConfig {
            max_file_size_mb: 1,
        });
        let path = Path::new("big.jpg");
        assert!(validator.check_size(path, 1024 * 1024).is_ok());
        let err = validator.check_size(path, 3 * 1024 * 1024).unwrap_err();
        match err {
            IngestError::FileTooLarge {
                size_mb, max_mb, ..
            } => {
                assert_eq!(size_mb, 3);
                assert_eq!(max_mb, 1);
            }
            other => panic!("Expected FileTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_huge_limit_saturates() {
        let validator = Validator::new(LimitsConfig {
            max_file_size_mb: u64::MAX,
        });
        assert_eq!(validator.max_bytes(), u64::MAX);
        assert!(validator.check_size(Path::new("any.jpg"), u64::MAX).is_ok());
    }
}
