use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centre of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Grow symmetrically by `margin` pixels, clamped to an image of the
    /// given dimensions. Never reaches outside the image.
    pub fn expand_clamped(&self, margin: u32, image_width: u32, image_height: u32) -> Rect {
        let x0 = self.x.saturating_sub(margin).min(image_width);
        let y0 = self.y.saturating_sub(margin).min(image_height);
        let x1 = self.x.saturating_add(self.width).saturating_add(margin).min(image_width);
        let y1 = self
            .y
            .saturating_add(self.height)
            .saturating_add(margin)
            .min(image_height);
        Rect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

/// A filtered contour with its geometric descriptors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Enclosed area from the shoelace formula, not a pixel count.
    pub area: f64,
    pub bbox: Rect,
    /// Centroid from polygon moments; bounding-box centre for contours whose
    /// zeroth moment vanishes.
    pub centroid: (f64, f64),
}

/// One persisted region crop, addressable by its 1-based sequence index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionArtifact {
    pub index: u32,
    pub region: Region,
    pub path: PathBuf,
}

/// Outcome of re-locating a stored template on a live capture. Only produced
/// when the score clears the configured confidence threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchResult {
    pub bbox: Rect,
    /// Normalised cross-correlation score in [0, 1].
    pub confidence: f32,
}

/// Per-run skip and failure accounting. Per-region failures never abort a
/// run; they end up here and are logged once at the end.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub contours: usize,
    pub kept: usize,
    pub exported: u32,
    pub skipped_degenerate: u32,
    pub skipped_empty_crop: u32,
    pub write_failures: u32,
}

/// Everything a detection run produced.
#[derive(Debug, Clone)]
pub struct DetectionReport {
    pub artifacts: Vec<RegionArtifact>,
    pub stats: RunStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_clamps_to_image_bounds() {
        let rect = Rect::new(45, 45, 4, 4);
        let grown = rect.expand_clamped(10, 50, 50);
        assert_eq!(grown, Rect::new(35, 35, 15, 15));
    }

    #[test]
    fn expand_with_zero_margin_is_identity() {
        let rect = Rect::new(3, 4, 10, 6);
        assert_eq!(rect.expand_clamped(0, 100, 100), rect);
    }

    #[test]
    fn center_of_unit_rect() {
        let rect = Rect::new(10, 20, 1, 1);
        assert_eq!(rect.center(), (10.5, 20.5));
    }
}
