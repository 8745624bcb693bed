use crate::perception::contours::Contour;
use crate::perception::types::Region;

/// Keep contours whose enclosed area lies strictly inside
/// `(min_area, max_area)` — both bounds excluded — and derive their
/// geometric descriptors.
///
/// Degenerate contours are dropped without error: zero-area boundaries
/// regardless of the bounds, and pathological point sets that produce no
/// usable bounding box (returned count, reported in the run stats).
pub fn filter_regions(
    contours: &[Contour],
    min_area: f64,
    max_area: f64,
) -> (Vec<Region>, u32) {
    let mut regions = Vec::new();
    let mut degenerate = 0u32;

    for contour in contours {
        let area = contour.area();
        if area <= 0.0 {
            continue;
        }
        if !(area > min_area && area < max_area) {
            continue;
        }
        let Some(bbox) = contour.bounding_rect() else {
            degenerate += 1;
            continue;
        };
        if bbox.width == 0 || bbox.height == 0 {
            degenerate += 1;
            continue;
        }
        let centroid = contour.centroid().unwrap_or_else(|| bbox.center());
        regions.push(Region {
            area,
            bbox,
            centroid,
        });
    }

    (regions, degenerate)
}
