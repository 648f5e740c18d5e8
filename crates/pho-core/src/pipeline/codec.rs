//! JPEG decoding and encoding.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::path::Path;

use crate::config::CodecConfig;
use crate::error::{IngestError, IngestResult};

/// The one still-image codec the pipeline accepts and produces.
pub struct ImageCodec {
    quality: u8,
}

impl ImageCodec {
    /// Create a codec with the given encoder settings.
    pub fn new(config: CodecConfig) -> Self {
        Self {
            quality: config.jpeg_quality,
        }
    }

    /// Decode JPEG bytes read from `path`.
    ///
    /// Anything that is not a well-formed JPEG is a `Decode` error, including
    /// other image formats.
    pub fn decode(&self, bytes: &[u8], path: &Path) -> IngestResult<DynamicImage> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg).map_err(|e| {
            IngestError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        let (width, height) = image.dimensions();
        tracing::trace!("  Decoded {:?}: {}x{}", path, width, height);
        Ok(image)
    }

    /// Encode a bitmap as JPEG bytes destined for `path`.
    ///
    /// Alpha is dropped; JPEG has no alpha channel.
    pub fn encode(&self, image: &DynamicImage, path: &Path) -> IngestResult<Vec<u8>> {
        let rgb = image.to_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.quality)
            .encode_image(&rgb)
            .map_err(|e| IngestError::Encode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(bytes)
    }
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    #[test]
    fn test_encode_produces_jpeg() {
        let codec = ImageCodec::default();
        let bytes = codec.encode(&gradient(64, 48), Path::new("out.jpg")).unwrap();
        // SOI marker
        assert_eq!(&bytes[0..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_decode_reads_back_dimensions() {
        let codec = ImageCodec::default();
        let bytes = codec.encode(&gradient(120, 80), Path::new("a.jpg")).unwrap();
        let image = codec.decode(&bytes, Path::new("a.jpg")).unwrap();
        assert_eq!(image.dimensions(), (120, 80));
    }

    #[test]
    fn test_encode_drops_alpha() {
        let codec = ImageCodec::default();
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 128])));
        let bytes = codec.encode(&rgba, Path::new("alpha.jpg")).unwrap();
        assert!(codec.decode(&bytes, Path::new("alpha.jpg")).is_ok());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let codec = ImageCodec::default();
        let err = codec
            .decode(b"definitely not a jpeg", Path::new("bad.jpg"))
            .unwrap_err();
        match err {
            IngestError::Decode { path, .. } => assert_eq!(path, Path::new("bad.jpg")),
            other => panic!("Expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_signature_only() {
        let codec = ImageCodec::default();
        assert!(codec
            .decode(&[0xFF, 0xD8, 0xFF, 0xE0], Path::new("t.jpg"))
            .is_err());
    }
}
