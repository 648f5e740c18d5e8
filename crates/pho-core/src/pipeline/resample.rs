//! Bounded-box downscaling for the display and thumbnail renditions.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use crate::config::RenditionConfig;

/// A maximum width and height a rendition must fit inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Produces downscaled copies with a Lanczos3 filter.
pub struct Resampler {
    display: BoundingBox,
    thumbnail: BoundingBox,
}

impl Resampler {
    /// Create a resampler with the configured display and thumbnail boxes.
    pub fn new(config: &RenditionConfig) -> Self {
        Self {
            display: BoundingBox::new(config.display_width, config.display_height),
            thumbnail: BoundingBox::new(config.thumb_width, config.thumb_height),
        }
    }

    pub fn display_box(&self) -> BoundingBox {
        self.display
    }

    pub fn thumbnail_box(&self) -> BoundingBox {
        self.thumbnail
    }

    /// Display-size rendition.
    pub fn display(&self, image: &DynamicImage) -> DynamicImage {
        Self::fit(image, self.display)
    }

    /// Thumbnail rendition.
    pub fn thumbnail(&self, image: &DynamicImage) -> DynamicImage {
        Self::fit(image, self.thumbnail)
    }

    /// Scale `image` to fit inside `bounds`, preserving aspect ratio.
    ///
    /// Never upscales: an image that already fits is returned as an unchanged
    /// copy.
    pub fn fit(image: &DynamicImage, bounds: BoundingBox) -> DynamicImage {
        let (width, height) = image.dimensions();
        let (w, h) = fit_dimensions(width, height, bounds);
        if (w, h) == (width, height) {
            return image.clone();
        }
        image.resize_exact(w, h, FilterType::Lanczos3)
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new(&RenditionConfig::default())
    }
}

/// Target dimensions for fitting `width`x`height` into `bounds`.
///
/// Width is clamped first, then height; each step rescales the other side
/// proportionally (truncating) and neither side drops below 1.
pub fn fit_dimensions(width: u32, height: u32, bounds: BoundingBox) -> (u32, u32) {
    if width <= bounds.width && height <= bounds.height {
        return (width, height);
    }

    let (mut w, mut h) = (u64::from(width), u64::from(height));
    let (max_w, max_h) = (u64::from(bounds.width), u64::from(bounds.height));

    if w > max_w {
        h = (h * max_w / w).max(1);
        w = max_w;
    }
    if h > max_h {
        w = (w * max_h / h).max(1);
        h = max_h;
    }

    // Both are bounded by u32 inputs at this point.
    (w as u32, h as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISPLAY: BoundingBox = BoundingBox::new(960, 720);
    const THUMB: BoundingBox = BoundingBox::new(348, 464);

    #[test]
    fn test_fit_dimensions_landscape() {
        assert_eq!(fit_dimensions(1920, 1080, DISPLAY), (960, 540));
        assert_eq!(fit_dimensions(4000, 3000, THUMB), (348, 261));
    }

    #[test]
    fn test_fit_dimensions_portrait_clamps_twice() {
        assert_eq!(fit_dimensions(1080, 1920, DISPLAY), (405, 720));
    }

    #[test]
    fn test_fit_dimensions_never_upscales() {
        assert_eq!(fit_dimensions(500, 400, DISPLAY), (500, 400));
        assert_eq!(fit_dimensions(1, 1, THUMB), (1, 1));
    }

    #[test]
    fn test_fit_dimensions_keeps_one_pixel() {
        assert_eq!(fit_dimensions(3000, 10, THUMB), (348, 1));
        assert_eq!(fit_dimensions(5, 50_000, THUMB), (1, 464));
    }

    #[test]
    fn test_fit_dimensions_properties() {
        let sources = [
            (1920, 1080),
            (1080, 1920),
            (4000, 3000),
            (3000, 4000),
            (961, 721),
            (960, 720),
            (12_000, 9_000),
            (640, 2_000),
            (2_000, 640),
            (349, 465),
            (10_000, 37),
        ];
        for bounds in [DISPLAY, THUMB] {
            for &(sw, sh) in &sources {
                let (w, h) = fit_dimensions(sw, sh, bounds);
                assert!(w <= bounds.width && h <= bounds.height, "{sw}x{sh} -> {w}x{h}");
                assert!(w <= sw && h <= sh, "{sw}x{sh} upscaled to {w}x{h}");
                assert!(w >= 1 && h >= 1);

                // Cross-multiplied aspect error stays within truncation slack.
                let skew = (u64::from(w) * u64::from(sh)).abs_diff(u64::from(h) * u64::from(sw));
                assert!(
                    skew <= 2 * u64::from(sw + sh),
                    "{sw}x{sh} -> {w}x{h} skews aspect by {skew}"
                );
            }
        }
    }

    #[test]
    fn test_fit_resizes_bitmap() {
        let img = DynamicImage::new_rgb8(1000, 500);
        let out = Resampler::fit(&img, THUMB);
        assert_eq!(out.dimensions(), (348, 174));
    }

    #[test]
    fn test_fit_small_image_unchanged() {
        let img = DynamicImage::new_rgb8(200, 100);
        let out = Resampler::fit(&img, DISPLAY);
        assert_eq!(out.dimensions(), (200, 100));
    }

    #[test]
    fn test_presets_from_config() {
        let resampler = Resampler::default();
        assert_eq!(resampler.display_box(), DISPLAY);
        assert_eq!(resampler.thumbnail_box(), THUMB);

        let img = DynamicImage::new_rgb8(1920, 1080);
        assert_eq!(resampler.display(&img).dimensions(), (960, 540));
        assert_eq!(resampler.thumbnail(&img).dimensions(), (348, 195));
    }
}
