use image::{GrayImage, Luma};

/// Morphological closing with a rectangular structuring element:
/// `iterations` dilations followed by `iterations` erosions.
///
/// Closing bridges small gaps inside one visual control (icon strokes, glyph
/// runs) so the whole control comes out of contour extraction as a single
/// blob. Kernel dimensions are the caller's precision/recall lever.
pub fn close(mask: &GrayImage, kernel_width: u32, kernel_height: u32, iterations: u32) -> GrayImage {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = rect_filter(&out, kernel_width, kernel_height, true);
    }
    for _ in 0..iterations {
        out = rect_filter(&out, kernel_width, kernel_height, false);
    }
    out
}

pub fn dilate(mask: &GrayImage, kernel_width: u32, kernel_height: u32) -> GrayImage {
    rect_filter(mask, kernel_width, kernel_height, true)
}

pub fn erode(mask: &GrayImage, kernel_width: u32, kernel_height: u32) -> GrayImage {
    rect_filter(mask, kernel_width, kernel_height, false)
}

/// A rectangular kernel is separable: one horizontal max/min pass followed by
/// one vertical pass. Samples outside the image are neutral (0 for dilation,
/// 255 for erosion), so the border never erodes inward on its own.
fn rect_filter(mask: &GrayImage, kernel_width: u32, kernel_height: u32, take_max: bool) -> GrayImage {
    let horizontal = span_filter(mask, kernel_width, true, take_max);
    span_filter(&horizontal, kernel_height, false, take_max)
}

fn span_filter(mask: &GrayImage, span: u32, horizontal: bool, take_max: bool) -> GrayImage {
    let (width, height) = mask.dimensions();
    let mut out = GrayImage::new(width, height);
    if width == 0 || height == 0 || span == 0 {
        return out;
    }

    // Anchor at the kernel centre: the window covers
    // [i - span/2, i + span - 1 - span/2].
    let before = (span / 2) as i64;
    let after = span as i64 - 1 - before;
    let limit = if horizontal { width } else { height } as i64;

    for y in 0..height {
        for x in 0..width {
            let center = if horizontal { x } else { y } as i64;
            let lo = (center - before).max(0);
            let hi = (center + after).min(limit - 1);
            let mut value = if take_max { 0u8 } else { 255u8 };
            for i in lo..=hi {
                let sample = if horizontal {
                    mask.get_pixel(i as u32, y)[0]
                } else {
                    mask.get_pixel(x, i as u32)[0]
                };
                value = if take_max {
                    value.max(sample)
                } else {
                    value.min(sample)
                };
            }
            out.put_pixel(x, y, Luma([value]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with(width: u32, height: u32, on: &[(u32, u32)]) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        for &(x, y) in on {
            mask.put_pixel(x, y, Luma([255]));
        }
        mask
    }

    fn on_pixels(mask: &GrayImage) -> Vec<(u32, u32)> {
        mask.enumerate_pixels()
            .filter(|(_, _, p)| p[0] != 0)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn closing_bridges_a_small_gap() {
        let mask = mask_with(25, 1, &[(10, 0), (14, 0)]);
        let closed = close(&mask, 9, 1, 1);
        assert_eq!(on_pixels(&closed), vec![(10, 0), (11, 0), (12, 0), (13, 0), (14, 0)]);
    }

    #[test]
    fn closing_preserves_a_solid_rectangle() {
        let mut mask = GrayImage::new(20, 20);
        for y in 5..12 {
            for x in 4..15 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        let closed = close(&mask, 3, 3, 1);
        assert_eq!(on_pixels(&closed), on_pixels(&mask));
    }

    #[test]
    fn closing_fills_a_small_hole() {
        let mut mask = GrayImage::new(16, 16);
        for y in 4..11 {
            for x in 4..11 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask.put_pixel(7, 7, Luma([0]));
        let closed = close(&mask, 3, 3, 1);
        assert_eq!(closed.get_pixel(7, 7)[0], 255);
    }

    #[test]
    fn dilation_near_the_border_stays_in_bounds() {
        let mask = mask_with(6, 6, &[(0, 0)]);
        let grown = dilate(&mask, 3, 3);
        assert_eq!(on_pixels(&grown), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn erosion_removes_an_isolated_pixel() {
        let mask = mask_with(6, 6, &[(3, 3)]);
        let shrunk = erode(&mask, 3, 3);
        assert!(on_pixels(&shrunk).is_empty());
    }
}
