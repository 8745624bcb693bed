use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

use crate::perception::types::Rect;

/// Closed outer boundary of one connected foreground component.
///
/// Points run around the component in order; the last point connects back to
/// the first. Collinear intermediate points are removed at construction, so a
/// filled rectangle keeps only its four corners.
#[derive(Debug, Clone)]
pub struct Contour {
    points: Vec<Point<i32>>,
}

/// Outer borders of all 8-connected foreground components (Suzuki-Abe border
/// following; hole borders are discarded). An all-background mask yields an
/// empty list. The order of returned contours is arbitrary.
pub fn extract(mask: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .map(|c| Contour::new(c.points))
        .collect()
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self {
            points: simplify(points),
        }
    }

    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    /// Enclosed area via the shoelace formula (Green's theorem). Zero for
    /// degenerate point-or-line contours, never negative.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut sum = 0i64;
        for (a, b) in self.edges() {
            sum += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
        }
        sum as f64 / 2.0
    }

    /// Inclusive bounding box of the boundary points. `None` only for an
    /// empty point set.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Rect::new(
            min_x as u32,
            min_y as u32,
            (max_x - min_x + 1) as u32,
            (max_y - min_y + 1) as u32,
        ))
    }

    /// Centroid from the first-order polygon moments, `None` when the zeroth
    /// moment is zero.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        let area = self.signed_area();
        if area == 0.0 {
            return None;
        }
        let mut mx = 0.0;
        let mut my = 0.0;
        for (a, b) in self.edges() {
            let cross = (a.x as f64) * (b.y as f64) - (b.x as f64) * (a.y as f64);
            mx += (a.x as f64 + b.x as f64) * cross;
            my += (a.y as f64 + b.y as f64) * cross;
        }
        Some((mx / (6.0 * area), my / (6.0 * area)))
    }

    fn edges(&self) -> impl Iterator<Item = (Point<i32>, Point<i32>)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// Drop points that sit on a straight run between their neighbours, keeping
/// corners and direction reversals (spike tips of one-pixel-wide components).
fn simplify(points: Vec<Point<i32>>) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points;
    }
    let mut kept = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];
        let (dx1, dy1) = (cur.x - prev.x, cur.y - prev.y);
        let (dx2, dy2) = (next.x - cur.x, next.y - cur.y);
        let cross = dx1 as i64 * dy2 as i64 - dy1 as i64 * dx2 as i64;
        let dot = dx1 as i64 * dx2 as i64 + dy1 as i64 * dy2 as i64;
        if cross != 0 || dot < 0 {
            kept.push(cur);
        }
    }
    if kept.is_empty() {
        // Fully collinear boundary; keep the endpoints so the bounding box
        // still spans the component.
        return points;
    }
    kept
}
