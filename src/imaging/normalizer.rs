use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::enhance::{enhance_contrast, enhance_sharpness, median_denoise};

/// Errors that can occur while loading an image to normalize.
#[derive(Debug, Error)]
pub enum ImageDecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unreadable image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Settings of the OCR-oriented image normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeSettings {
    /// Images narrower than this are upscaled to exactly this width.
    pub target_width: u32,
    /// Contrast multiplier (1.0 = unchanged).
    pub contrast: f32,
    /// Sharpness multiplier (1.0 = unchanged).
    pub sharpness: f32,
    /// Median denoise radius, `None` to skip denoising. Removes speckle but
    /// can blur thin glyph strokes.
    pub median_radius: Option<u32>,
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            target_width: 1000,
            contrast: 2.0,
            sharpness: 2.0,
            median_radius: Some(1),
        }
    }
}

/// Turns screenshots into grayscale images OCR performs best on.
#[derive(Debug, Clone, Default)]
pub struct ImageNormalizer {
    settings: NormalizeSettings,
}

impl ImageNormalizer {
    pub fn new(settings: NormalizeSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &NormalizeSettings {
        &self.settings
    }

    /// Decode and normalize an image file.
    pub fn normalize_file(&self, path: &Path) -> Result<GrayImage, ImageDecodeError> {
        let bytes = std::fs::read(path)?;
        self.normalize_bytes(&bytes)
    }

    /// Decode and normalize encoded image bytes (PNG, JPEG, ...).
    pub fn normalize_bytes(&self, bytes: &[u8]) -> Result<GrayImage, ImageDecodeError> {
        let image = image::load_from_memory(bytes)?;
        Ok(self.normalize(&image))
    }

    /// Normalize a decoded image. The input is left untouched.
    ///
    /// Grayscale conversion, upscale to the target width if narrower,
    /// contrast then sharpness enhancement, optional median denoise.
    /// Images already wide enough are never downscaled.
    pub fn normalize(&self, image: &DynamicImage) -> GrayImage {
        let mut gray = image.to_luma8();

        let (width, height) = gray.dimensions();
        if width > 0 && width < self.settings.target_width {
            let new_width = self.settings.target_width;
            let new_height =
                ((height as u64 * new_width as u64) / width as u64).max(1) as u32;
            debug!(
                "Upscaling image from {}x{} to {}x{}",
                width, height, new_width, new_height
            );
            gray = image::imageops::resize(&gray, new_width, new_height, FilterType::Lanczos3);
        }

        let gray = enhance_contrast(&gray, self.settings.contrast);
        let gray = enhance_sharpness(&gray, self.settings.sharpness);

        match self.settings.median_radius {
            Some(radius) => median_denoise(&gray, radius),
            None => gray,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode_png(image: &RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_narrow_image_is_upscaled_to_target_width() {
        let image = RgbImage::from_pixel(250, 500, Rgb([10, 200, 30]));
        let normalized = ImageNormalizer::default().normalize_bytes(&encode_png(&image)).unwrap();
        assert_eq!(normalized.dimensions(), (1000, 2000));
    }

    #[test]
    fn test_upscale_keeps_aspect_ratio_with_truncation() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(300, 301));
        let normalized = ImageNormalizer::default().normalize(&image);
        // 301 * 1000 / 300 = 1003.33
        assert_eq!(normalized.dimensions(), (1000, 1003));
    }

    #[test]
    fn test_every_narrow_width_reaches_target_width() {
        let normalizer = ImageNormalizer::new(NormalizeSettings {
            contrast: 1.0,
            sharpness: 1.0,
            median_radius: None,
            ..Default::default()
        });
        for width in [1, 3, 19, 38, 61, 99, 121, 250, 333, 999] {
            let image = DynamicImage::ImageRgb8(RgbImage::new(width, 2));
            let normalized = normalizer.normalize(&image);
            assert_eq!(normalized.width(), 1000, "input width {}", width);
        }
    }

    #[test]
    fn test_wide_image_is_not_resized() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(1200, 80));
        let normalized = ImageNormalizer::default().normalize(&image);
        assert_eq!(normalized.dimensions(), (1200, 80));
    }

    #[test]
    fn test_input_image_is_not_mutated() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 20, Rgb([90, 90, 90])));
        let before = image.clone();
        let _ = ImageNormalizer::default().normalize(&image);
        assert_eq!(image, before);
    }

    #[test]
    fn test_enhancement_increases_spread() {
        let mut image = RgbImage::from_pixel(1000, 10, Rgb([100, 100, 100]));
        for x in 500..1000 {
            for y in 0..10 {
                image.put_pixel(x, y, Rgb([150, 150, 150]));
            }
        }
        let settings = NormalizeSettings {
            median_radius: None,
            ..Default::default()
        };
        let normalized = ImageNormalizer::new(settings).normalize(&DynamicImage::ImageRgb8(image));
        assert!(normalized.get_pixel(100, 5).0[0] < 100);
        assert!(normalized.get_pixel(900, 5).0[0] > 150);
    }

    #[test]
    fn test_undecodable_bytes() {
        let result = ImageNormalizer::default().normalize_bytes(b"definitely not an image");
        assert!(matches!(result, Err(ImageDecodeError::Decode(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ImageNormalizer::default().normalize_file(Path::new("/nonexistent/shot.png"));
        assert!(matches!(result, Err(ImageDecodeError::Io(_))));
    }
}
