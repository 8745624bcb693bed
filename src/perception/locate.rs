use image::{DynamicImage, GrayImage};
use imageproc::template_matching::{find_extremes, match_template, MatchTemplateMethod};

use crate::errors::{ScoutError, ScoutResult};
use crate::perception::preprocess;
use crate::perception::types::{MatchResult, Rect, RegionArtifact};

/// Re-find a stored region crop on a live capture.
///
/// Normalised cross-correlation over the grayscale images; the best-scoring
/// position is returned only when it clears `min_confidence`. The threshold
/// deliberately sits below 1.0: anti-aliasing, theming and hover/focus state
/// shift pixels between the stored crop and the live screen, so an exact
/// match requirement would fail after any redraw. A sub-threshold best score
/// is a valid negative result (`Ok(None)`), not an error.
pub fn locate(
    template: &DynamicImage,
    capture: &DynamicImage,
    min_confidence: f32,
) -> ScoutResult<Option<MatchResult>> {
    let template = preprocess::to_intensity(template)?;
    let capture = preprocess::to_intensity(capture)?;
    locate_gray(&template, &capture, min_confidence)
}

pub fn locate_gray(
    template: &GrayImage,
    capture: &GrayImage,
    min_confidence: f32,
) -> ScoutResult<Option<MatchResult>> {
    if !(0.0..=1.0).contains(&min_confidence) {
        return Err(ScoutError::Config(format!(
            "match confidence must be in [0, 1], got {min_confidence}"
        )));
    }
    if template.width() == 0 || template.height() == 0 {
        return Err(ScoutError::Input("empty template image".into()));
    }
    if template.width() > capture.width() || template.height() > capture.height() {
        return Err(ScoutError::Input(format!(
            "template {}x{} larger than capture {}x{}",
            template.width(),
            template.height(),
            capture.width(),
            capture.height()
        )));
    }

    let scores = match_template(
        capture,
        template,
        MatchTemplateMethod::CrossCorrelationNormalized,
    );
    let extremes = find_extremes(&scores);
    let (x, y) = extremes.max_value_location;
    tracing::debug!(score = extremes.max_value, x, y, "best template match");

    if !extremes.max_value.is_finite() || extremes.max_value < min_confidence {
        return Ok(None);
    }
    Ok(Some(MatchResult {
        bbox: Rect::new(x, y, template.width(), template.height()),
        confidence: extremes.max_value.min(1.0),
    }))
}

/// Search one live capture for every exported artifact, in index order.
/// Unreadable templates are skipped with a warning; per-template negative
/// results do not stop the batch.
pub fn locate_all(
    artifacts: &[RegionArtifact],
    capture: &DynamicImage,
    min_confidence: f32,
) -> ScoutResult<Vec<(u32, Option<MatchResult>)>> {
    let capture_gray = preprocess::to_intensity(capture)?;
    let mut results = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        let template = match image::open(&artifact.path) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(index = artifact.index, error = %e, "template unreadable, skipping");
                continue;
            }
        };
        let template = preprocess::to_intensity(&template)?;
        let found = locate_gray(&template, &capture_gray, min_confidence)?;
        match &found {
            Some(m) => tracing::debug!(
                index = artifact.index,
                confidence = m.confidence,
                "template re-located"
            ),
            None => tracing::debug!(index = artifact.index, "template not found"),
        }
        results.push((artifact.index, found));
    }
    Ok(results)
}
