use image::{GrayImage, Luma};
use imageproc::edges::canny;

use crate::config::SegmentationConfig;
use crate::errors::{ScoutError, ScoutResult};

pub const FOREGROUND: u8 = 255;

/// Turn an intensity image into a {0, 255} structure mask using the
/// configured strategy.
pub fn segment(intensity: &GrayImage, config: &SegmentationConfig) -> ScoutResult<GrayImage> {
    match *config {
        SegmentationConfig::AdaptiveThreshold { block_size, c } => {
            if block_size < 3 || block_size % 2 == 0 {
                return Err(ScoutError::Config(format!(
                    "adaptive block size must be odd and >= 3, got {block_size}"
                )));
            }
            Ok(adaptive_threshold_inv(intensity, block_size, c))
        }
        SegmentationConfig::Edges {
            low_threshold,
            high_threshold,
        } => {
            if low_threshold >= high_threshold {
                return Err(ScoutError::InvalidThresholdOrder {
                    low: low_threshold,
                    high: high_threshold,
                });
            }
            Ok(canny(intensity, low_threshold, high_threshold))
        }
    }
}

/// Inverted adaptive threshold: foreground where the pixel is darker than its
/// neighbourhood mean minus `c`. The window is clamped at the image border.
/// Neighbourhood sums come from an integral image, so the cost is independent
/// of `block_size`.
fn adaptive_threshold_inv(intensity: &GrayImage, block_size: u32, c: f64) -> GrayImage {
    let (width, height) = intensity.dimensions();
    let mut mask = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return mask;
    }

    // Summed-area table with a zero row and column ahead of the image.
    let w = width as usize;
    let h = height as usize;
    let stride = w + 1;
    let mut integral = vec![0u64; stride * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += intensity.get_pixel(x as u32, y as u32)[0] as u64;
            integral[(y + 1) * stride + (x + 1)] = integral[y * stride + (x + 1)] + row_sum;
        }
    }

    let half = (block_size / 2) as i64;
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let x0 = (x - half).max(0) as usize;
            let y0 = (y - half).max(0) as usize;
            let x1 = (x + half).min(w as i64 - 1) as usize + 1;
            let y1 = (y + half).min(h as i64 - 1) as usize + 1;
            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let count = ((x1 - x0) * (y1 - y0)) as f64;
            let mean = sum as f64 / count;
            let value = intensity.get_pixel(x as u32, y as u32)[0] as f64;
            if value < mean - c {
                mask.put_pixel(x as u32, y as u32, Luma([FOREGROUND]));
            }
        }
    }
    mask
}
