//! Whole-image enhancement filters.
//!
//! Contrast and sharpness are both expressed as a blend between the image
//! and a "degenerate" version of it: a factor of 1.0 returns the original,
//! 0.0 returns the degenerate image, and values above 1.0 push pixels away
//! from it.

use image::{GrayImage, ImageBuffer, Luma};

/// Smoothing kernel used as the degenerate image for sharpness.
#[rustfmt::skip]
const SMOOTH_KERNEL: [f32; 9] = [
    1.0 / 13.0, 1.0 / 13.0, 1.0 / 13.0,
    1.0 / 13.0, 5.0 / 13.0, 1.0 / 13.0,
    1.0 / 13.0, 1.0 / 13.0, 1.0 / 13.0,
];

/// Scale the distance of every pixel from the mean luminance by `factor`.
pub fn enhance_contrast(image: &GrayImage, factor: f32) -> GrayImage {
    let pixel_count = image.width() as u64 * image.height() as u64;
    if pixel_count == 0 {
        return image.clone();
    }

    let sum: u64 = image.pixels().map(|p| p.0[0] as u64).sum();
    let mean = (sum as f64 / pixel_count as f64 + 0.5).floor() as f32;

    let mut enhanced = image.clone();
    for pixel in enhanced.pixels_mut() {
        pixel.0[0] = blend(mean, pixel.0[0] as f32, factor);
    }
    enhanced
}

/// Scale the difference between every pixel and its smoothed neighbourhood
/// by `factor`. Border pixels have no full neighbourhood and are kept as is.
pub fn enhance_sharpness(image: &GrayImage, factor: f32) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut enhanced = image.clone();
    if width < 3 || height < 3 {
        return enhanced;
    }

    let smoothed: ImageBuffer<Luma<f32>, Vec<f32>> =
        imageproc::filter::filter3x3::<_, f32, f32>(image, &SMOOTH_KERNEL);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let original = image.get_pixel(x, y).0[0] as f32;
            let degenerate = smoothed.get_pixel(x, y).0[0];
            enhanced.put_pixel(x, y, Luma([blend(degenerate, original, factor)]));
        }
    }
    enhanced
}

/// Median filter over a square window of `2 * radius + 1` pixels.
pub fn median_denoise(image: &GrayImage, radius: u32) -> GrayImage {
    if radius == 0 {
        return image.clone();
    }
    imageproc::filter::median_filter(image, radius, radius)
}

fn blend(degenerate: f32, value: f32, factor: f32) -> u8 {
    (degenerate + factor * (value - degenerate))
        .round()
        .clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| Luma([(x * 255 / (width - 1)) as u8]))
    }

    #[test]
    fn test_contrast_factor_one_is_identity() {
        let image = gradient(16, 4);
        assert_eq!(enhance_contrast(&image, 1.0), image);
    }

    #[test]
    fn test_contrast_pushes_pixels_away_from_mean() {
        let image = GrayImage::from_raw(4, 1, vec![100, 100, 140, 140]).unwrap();
        let enhanced = enhance_contrast(&image, 2.0);
        // mean = 120
        assert_eq!(enhanced.into_raw(), vec![80, 80, 160, 160]);
    }

    #[test]
    fn test_contrast_clamps() {
        let image = GrayImage::from_raw(2, 1, vec![0, 255]).unwrap();
        let enhanced = enhance_contrast(&image, 3.0);
        assert_eq!(enhanced.into_raw(), vec![0, 255]);
    }

    #[test]
    fn test_sharpness_keeps_flat_image() {
        let image = GrayImage::from_pixel(8, 8, Luma([77]));
        assert_eq!(enhance_sharpness(&image, 2.0), image);
    }

    #[test]
    fn test_sharpness_boosts_isolated_dot() {
        let mut image = GrayImage::from_pixel(5, 5, Luma([0]));
        image.put_pixel(2, 2, Luma([100]));
        let enhanced = enhance_sharpness(&image, 2.0);
        // smoothed centre = 500 / 13 ~= 38.46, 38.46 + 2 * (100 - 38.46) ~= 161.5
        assert_eq!(enhanced.get_pixel(2, 2).0[0], 162);
        // borders untouched
        assert_eq!(enhanced.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn test_sharpness_on_tiny_image_is_noop() {
        let image = gradient(2, 2);
        assert_eq!(enhance_sharpness(&image, 2.0), image);
    }

    #[test]
    fn test_median_removes_speckle() {
        let mut image = GrayImage::from_pixel(5, 5, Luma([200]));
        image.put_pixel(2, 2, Luma([0]));
        let denoised = median_denoise(&image, 1);
        assert_eq!(denoised.get_pixel(2, 2).0[0], 200);
        assert_eq!(median_denoise(&image, 0), image);
    }
}
