use image::{DynamicImage, GrayImage, Luma};

use crate::errors::{ScoutError, ScoutResult};

/// Flatten a 3- or 4-channel buffer to an 8-bit intensity image using the
/// BT.601 luma weighting. Alpha is discarded. Any other channel count fails
/// with [`ScoutError::UnsupportedChannelCount`].
pub fn to_intensity(image: &DynamicImage) -> ScoutResult<GrayImage> {
    let channels = image.color().channel_count();
    if channels != 3 && channels != 4 {
        return Err(ScoutError::UnsupportedChannelCount(channels));
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = GrayImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        out.put_pixel(x, y, Luma([luma.round().min(255.0) as u8]));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn rgb_converts_with_bt601_weights() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
        let gray = to_intensity(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(gray.get_pixel(0, 0)[0], 76);
    }

    #[test]
    fn alpha_is_ignored() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 255, 0, 7]));
        let gray = to_intensity(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(gray.get_pixel(0, 0)[0], 150);
    }

    #[test]
    fn grayscale_input_is_rejected() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        assert!(matches!(
            to_intensity(&img),
            Err(ScoutError::UnsupportedChannelCount(1))
        ));
    }
}
