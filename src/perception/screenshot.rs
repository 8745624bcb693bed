use std::path::PathBuf;

use image::DynamicImage;
use xcap::Monitor;

use crate::errors::{ScoutError, ScoutResult};
use crate::perception::types::Rect;

/// One candidate source of pixels for the pipeline: a stored raster file or
/// a live capture of the primary monitor (optionally cropped to a region).
#[derive(Debug, Clone)]
pub enum ImageSource {
    File(PathBuf),
    PrimaryScreen,
    ScreenRegion(Rect),
}

impl ImageSource {
    pub fn acquire(&self) -> ScoutResult<DynamicImage> {
        match self {
            ImageSource::File(path) => image::open(path)
                .map_err(|e| ScoutError::Input(format!("cannot read {}: {e}", path.display()))),
            ImageSource::PrimaryScreen => capture_primary(),
            ImageSource::ScreenRegion(rect) => {
                let frame = capture_primary()?;
                if rect.x + rect.width > frame.width() || rect.y + rect.height > frame.height() {
                    return Err(ScoutError::Capture(format!(
                        "region {rect:?} outside monitor frame {}x{}",
                        frame.width(),
                        frame.height()
                    )));
                }
                Ok(frame.crop_imm(rect.x, rect.y, rect.width, rect.height))
            }
        }
    }
}

/// Try each candidate source in order until one yields an image. Failures are
/// logged and the next candidate is consulted; only exhausting the list is an
/// input error.
pub fn acquire_first(sources: &[ImageSource]) -> ScoutResult<DynamicImage> {
    for source in sources {
        match source.acquire() {
            Ok(img) => return Ok(img),
            Err(e) => {
                tracing::warn!(source = ?source, error = %e, "image source failed, trying next")
            }
        }
    }
    Err(ScoutError::Input(
        "no image source could be acquired".into(),
    ))
}

fn capture_primary() -> ScoutResult<DynamicImage> {
    let monitors =
        Monitor::all().map_err(|e| ScoutError::Capture(format!("monitor enumeration: {e}")))?;
    let monitor = monitors
        .iter()
        .find(|m| m.is_primary())
        .or_else(|| monitors.first())
        .ok_or_else(|| ScoutError::Capture("no monitor available".into()))?;
    let frame = monitor
        .capture_image()
        .map_err(|e| ScoutError::Capture(format!("screen capture: {e}")))?;
    tracing::debug!(
        width = frame.width(),
        height = frame.height(),
        "captured primary monitor"
    );
    // xcap returns a buffer from its own (older) `image` version; rewrap the
    // raw bytes into this crate's `image` types.
    let (width, height) = (frame.width(), frame.height());
    let buffer = image::RgbaImage::from_raw(width, height, frame.into_raw())
        .ok_or_else(|| ScoutError::Capture("captured frame has inconsistent buffer size".into()))?;
    Ok(DynamicImage::ImageRgba8(buffer))
}
