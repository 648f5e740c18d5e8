//! Shared helpers for unit tests.

use image::{DynamicImage, Rgb, RgbImage};
use std::path::Path;

use crate::config::Config;
use crate::pipeline::ImageCodec;

/// Default configuration rooted at `root`.
pub(crate) fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.storage.root = root.to_path_buf();
    config
}

/// Encode a gradient of the given size as JPEG.
pub(crate) fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 96])
    }));
    ImageCodec::default()
        .encode(&image, Path::new("fixture.jpg"))
        .unwrap()
}

/// Write a JPEG of the given size to `path`.
pub(crate) fn write_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}
