//! UiScout — screen element detection pipeline.
//!
//! Given a raster screenshot, UiScout locates rectangular regions likely to
//! correspond to UI controls (icons, buttons, text fields) without any
//! semantic understanding of the application: segment the frame into a
//! binary structure mask, close small gaps morphologically, trace the outer
//! contours of the resulting blobs, filter them by area, and export each
//! survivor as a numbered crop. Exported crops can later be re-found on a
//! live, possibly-changed screen via normalised cross-correlation.

pub mod config;
pub mod errors;
pub mod perception;

pub use config::{DetectionConfig, SegmentationConfig};
pub use errors::{ScoutError, ScoutResult};
pub use perception::pipeline::run_detection;
pub use perception::types::{
    DetectionReport, MatchResult, Rect, Region, RegionArtifact, RunStats,
};
