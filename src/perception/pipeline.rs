/// Detection pipeline — source image -> intensity -> binary mask -> closed
/// mask -> contours -> filtered regions -> exported artifacts + annotated
/// review frame.
///
/// Each stage fully consumes its input and produces a fresh buffer before the
/// next stage starts; the run is synchronous and deterministic for a given
/// image and configuration.
use image::DynamicImage;

use crate::config::DetectionConfig;
use crate::errors::ScoutResult;
use crate::perception::export::RegionExporter;
use crate::perception::types::{DetectionReport, RegionArtifact, RunStats};
use crate::perception::{annotator, contours, morphology, preprocess, regions, segment};

pub fn run_detection(
    config: &DetectionConfig,
    source: &DynamicImage,
) -> ScoutResult<DetectionReport> {
    config.validate()?;

    let intensity = preprocess::to_intensity(source)?;
    let mask = segment::segment(&intensity, &config.segmentation)?;
    let closed = morphology::close(
        &mask,
        config.closing.kernel_width,
        config.closing.kernel_height,
        config.closing.iterations,
    );
    let found = contours::extract(&closed);
    tracing::debug!(count = found.len(), "contours after closing");

    let (mut kept, degenerate) = regions::filter_regions(&found, config.min_area, config.max_area);
    tracing::debug!(kept = kept.len(), degenerate, "regions after area filter");

    // Extraction order is arbitrary; number regions top-to-bottom,
    // left-to-right so artifact indices are stable across runs.
    kept.sort_by_key(|r| (r.bbox.y, r.bbox.x));

    let mut exporter = RegionExporter::new(&config.output_dir)?;
    let mut artifacts: Vec<RegionArtifact> = Vec::with_capacity(kept.len());
    for region in &kept {
        if let Some(artifact) = exporter.export(region, source, config.margin) {
            artifacts.push(artifact);
        }
    }

    let annotated = annotator::annotate(source, &artifacts);
    let annotated_path = config.output_dir.join("annotated.png");
    if let Err(e) = annotated.save(&annotated_path) {
        tracing::warn!(error = %e, path = %annotated_path.display(), "failed to write review frame");
    }

    let stats = RunStats {
        contours: found.len(),
        kept: kept.len(),
        exported: artifacts.len() as u32,
        skipped_degenerate: degenerate,
        skipped_empty_crop: exporter.skipped_empty_crop(),
        write_failures: exporter.write_failures(),
    };
    tracing::info!(
        contours = stats.contours,
        exported = stats.exported,
        skipped_degenerate = stats.skipped_degenerate,
        skipped_empty_crop = stats.skipped_empty_crop,
        write_failures = stats.write_failures,
        "detection run complete"
    );

    Ok(DetectionReport { artifacts, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SegmentationConfig;
    use crate::perception::types::Rect;
    use image::{Rgb, RgbImage};

    /// White 200x200 frame with one filled gray rectangle at (80, 60), 40x20.
    fn gray_rect_frame() -> DynamicImage {
        let mut img = RgbImage::from_pixel(200, 200, Rgb([255, 255, 255]));
        for y in 60..80 {
            for x in 80..120 {
                img.put_pixel(x, y, Rgb([128, 128, 128]));
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    fn config_in(dir: &std::path::Path) -> DetectionConfig {
        let mut cfg = DetectionConfig::adaptive_threshold();
        cfg.output_dir = dir.to_path_buf();
        cfg
    }

    #[test]
    fn gray_rectangle_yields_exactly_one_artifact_at_its_true_position() {
        let dir = tempfile::tempdir().unwrap();
        let report = run_detection(&config_in(dir.path()), &gray_rect_frame()).unwrap();

        assert_eq!(report.artifacts.len(), 1);
        let artifact = &report.artifacts[0];
        assert_eq!(artifact.index, 1);
        assert_eq!(artifact.region.bbox, Rect::new(80, 60, 40, 20));

        let saved = image::open(&artifact.path).unwrap();
        assert_eq!((saved.width(), saved.height()), (40, 20));
        assert!(dir.path().join("annotated.png").exists());
    }

    #[test]
    fn identical_runs_produce_identical_artifacts() {
        let frame = gray_rect_frame();
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();

        let a = run_detection(&config_in(dir_a.path()), &frame).unwrap();
        let b = run_detection(&config_in(dir_b.path()), &frame).unwrap();

        assert_eq!(a.artifacts.len(), b.artifacts.len());
        for (left, right) in a.artifacts.iter().zip(&b.artifacts) {
            assert_eq!(left.index, right.index);
            assert_eq!(left.region.bbox, right.region.bbox);
        }
    }

    #[test]
    fn blank_frame_exports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let frame = DynamicImage::ImageRgb8(RgbImage::from_pixel(120, 90, Rgb([255, 255, 255])));
        let report = run_detection(&config_in(dir.path()), &frame).unwrap();
        assert!(report.artifacts.is_empty());
        assert_eq!(report.stats.exported, 0);
    }

    #[test]
    fn edge_strategy_detects_the_same_rectangle() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = DetectionConfig::edge_detection();
        cfg.output_dir = dir.path().to_path_buf();

        let report = run_detection(&cfg, &gray_rect_frame()).unwrap();
        assert_eq!(report.artifacts.len(), 1);
        // Canny localises the boundary to within a couple of pixels; the box
        // must still cover the rectangle's centre.
        let bbox = report.artifacts[0].region.bbox;
        assert!(bbox.x <= 100 && bbox.x + bbox.width >= 100);
        assert!(bbox.y <= 70 && bbox.y + bbox.height >= 70);
        assert!((36..=48).contains(&bbox.width));
        assert!((16..=28).contains(&bbox.height));
    }

    #[test]
    fn invalid_config_fails_before_processing() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_in(dir.path());
        cfg.segmentation = SegmentationConfig::Edges {
            low_threshold: 150.0,
            high_threshold: 50.0,
        };
        assert!(run_detection(&cfg, &gray_rect_frame()).is_err());
        // Nothing may have been written.
        assert!(!dir.path().join("0001.png").exists());
    }

    /// Like [`gray_rect_frame`] but with a black outline, so the exported
    /// crop is textured enough to be a meaningful correlation template.
    fn outlined_rect_frame() -> DynamicImage {
        let mut img = RgbImage::from_pixel(200, 200, Rgb([255, 255, 255]));
        for y in 60..80 {
            for x in 80..120 {
                let on_rim = y == 60 || y == 79 || x == 80 || x == 119;
                let colour = if on_rim { Rgb([0, 0, 0]) } else { Rgb([128, 128, 128]) };
                img.put_pixel(x, y, colour);
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn exported_artifact_can_be_relocated_on_the_source_frame() {
        let dir = tempfile::tempdir().unwrap();
        let frame = outlined_rect_frame();
        let report = run_detection(&config_in(dir.path()), &frame).unwrap();

        let results =
            crate::perception::locate::locate_all(&report.artifacts, &frame, 0.85).unwrap();
        assert_eq!(results.len(), 1);
        let (index, found) = results[0];
        assert_eq!(index, 1);
        let found = found.expect("artifact should match its own source frame");
        assert_eq!((found.bbox.x, found.bbox.y), (80, 60));
        assert!(found.confidence > 0.999);
    }
}
