use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{ScoutError, ScoutResult};

/// Full configuration surface of a detection run.
///
/// The historical tooling this replaces carried two parameter bundles across
/// near-duplicate scripts; both survive here as presets
/// ([`DetectionConfig::adaptive_threshold`] and
/// [`DetectionConfig::edge_detection`]) and every knob can be overridden
/// independently via `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub closing: ClosingConfig,
    /// Regions are kept iff `min_area < area < max_area` (open interval).
    #[serde(default = "default_min_area")]
    pub min_area: f64,
    #[serde(default = "default_max_area")]
    pub max_area: f64,
    /// Extra pixels around each bounding box when cropping artifacts.
    #[serde(default)]
    pub margin: u32,
    /// Template-matching acceptance threshold in [0, 1].
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Binary segmentation strategy and its parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SegmentationConfig {
    /// Inverted local-mean threshold: a pixel is foreground when it is darker
    /// than its neighbourhood mean minus `c`. Picks up dark-on-light text
    /// and icon strokes.
    AdaptiveThreshold {
        /// Side of the square neighbourhood window. Must be odd and >= 3.
        #[serde(default = "default_block_size")]
        block_size: u32,
        #[serde(default = "default_adaptive_c")]
        c: f64,
    },
    /// Canny edge detection with hysteresis. Requires `low < high`.
    Edges {
        #[serde(default = "default_low_threshold")]
        low_threshold: f32,
        #[serde(default = "default_high_threshold")]
        high_threshold: f32,
    },
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        SegmentationConfig::AdaptiveThreshold {
            block_size: default_block_size(),
            c: default_adaptive_c(),
        }
    }
}

/// Rectangular structuring element for the morphological closing step.
///
/// This is the primary precision/recall lever: wider or taller kernels merge
/// fragments of one control into a single blob, but also risk gluing adjacent
/// controls together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingConfig {
    #[serde(default = "default_kernel_width")]
    pub kernel_width: u32,
    #[serde(default = "default_kernel_height")]
    pub kernel_height: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

impl Default for ClosingConfig {
    fn default() -> Self {
        Self {
            kernel_width: default_kernel_width(),
            kernel_height: default_kernel_height(),
            iterations: default_iterations(),
        }
    }
}

fn default_block_size() -> u32 {
    15
}

fn default_adaptive_c() -> f64 {
    5.0
}

fn default_low_threshold() -> f32 {
    50.0
}

fn default_high_threshold() -> f32 {
    150.0
}

fn default_kernel_width() -> u32 {
    9
}

fn default_kernel_height() -> u32 {
    3
}

fn default_iterations() -> u32 {
    1
}

fn default_min_area() -> f64 {
    15.0
}

fn default_max_area() -> f64 {
    10_000.0
}

fn default_min_confidence() -> f32 {
    0.85
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("regions")
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self::adaptive_threshold()
    }
}

impl DetectionConfig {
    /// Parameter bundle tuned for text and small icons: inverted adaptive
    /// threshold, a flat 9x3 kernel, area bounds (15, 10000), no crop margin.
    pub fn adaptive_threshold() -> Self {
        Self {
            segmentation: SegmentationConfig::AdaptiveThreshold {
                block_size: default_block_size(),
                c: default_adaptive_c(),
            },
            closing: ClosingConfig {
                kernel_width: 9,
                kernel_height: 3,
                iterations: 1,
            },
            min_area: 15.0,
            max_area: 10_000.0,
            margin: 0,
            min_confidence: default_min_confidence(),
            output_dir: default_output_dir(),
        }
    }

    /// Parameter bundle tuned for larger outlined controls: Canny edges,
    /// a square 12x12 kernel, area bounds (100, 15000), 5 px crop margin.
    pub fn edge_detection() -> Self {
        Self {
            segmentation: SegmentationConfig::Edges {
                low_threshold: default_low_threshold(),
                high_threshold: default_high_threshold(),
            },
            closing: ClosingConfig {
                kernel_width: 12,
                kernel_height: 12,
                iterations: 1,
            },
            min_area: 100.0,
            max_area: 15_000.0,
            margin: 5,
            min_confidence: default_min_confidence(),
            output_dir: default_output_dir(),
        }
    }

    /// Check everything that must hold before any pixel is processed.
    pub fn validate(&self) -> ScoutResult<()> {
        match self.segmentation {
            SegmentationConfig::AdaptiveThreshold { block_size, c } => {
                if block_size < 3 || block_size % 2 == 0 {
                    return Err(ScoutError::Config(format!(
                        "adaptive block size must be odd and >= 3, got {block_size}"
                    )));
                }
                if !c.is_finite() {
                    return Err(ScoutError::Config(format!(
                        "adaptive constant must be finite, got {c}"
                    )));
                }
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
                if low_threshold < 0.0 {
                    return Err(ScoutError::Config(format!(
                        "edge thresholds must be non-negative, got low {low_threshold}"
                    )));
                }
            }
        }

        if self.closing.kernel_width == 0 || self.closing.kernel_height == 0 {
            return Err(ScoutError::Config(format!(
                "closing kernel must be at least 1x1, got {}x{}",
                self.closing.kernel_width, self.closing.kernel_height
            )));
        }
        if self.closing.iterations == 0 {
            return Err(ScoutError::Config(
                "closing iterations must be at least 1".into(),
            ));
        }
        if self.min_area >= self.max_area {
            return Err(ScoutError::Config(format!(
                "min area {} must be below max area {}",
                self.min_area, self.max_area
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ScoutError::Config(format!(
                "match confidence must be in [0, 1], got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

fn resolve_config_path() -> ScoutResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("config.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join("config.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    Err(ScoutError::Config(
        "config.toml not found next to executable or in working directory".into(),
    ))
}

pub fn load_config() -> ScoutResult<DetectionConfig> {
    let path = resolve_config_path()?;
    let content = std::fs::read_to_string(&path)?;
    let config: DetectionConfig = toml::from_str(&content)?;
    config.validate()?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        DetectionConfig::adaptive_threshold().validate().unwrap();
        DetectionConfig::edge_detection().validate().unwrap();
    }

    #[test]
    fn even_block_size_rejected() {
        let mut cfg = DetectionConfig::adaptive_threshold();
        cfg.segmentation = SegmentationConfig::AdaptiveThreshold {
            block_size: 14,
            c: 5.0,
        };
        assert!(matches!(cfg.validate(), Err(ScoutError::Config(_))));
    }

    #[test]
    fn swapped_edge_thresholds_rejected() {
        let mut cfg = DetectionConfig::edge_detection();
        cfg.segmentation = SegmentationConfig::Edges {
            low_threshold: 150.0,
            high_threshold: 50.0,
        };
        assert!(matches!(
            cfg.validate(),
            Err(ScoutError::InvalidThresholdOrder { .. })
        ));
    }

    #[test]
    fn zero_kernel_rejected() {
        let mut cfg = DetectionConfig::adaptive_threshold();
        cfg.closing.kernel_width = 0;
        assert!(matches!(cfg.validate(), Err(ScoutError::Config(_))));
    }

    #[test]
    fn inverted_area_bounds_rejected() {
        let mut cfg = DetectionConfig::adaptive_threshold();
        cfg.min_area = 500.0;
        cfg.max_area = 100.0;
        assert!(matches!(cfg.validate(), Err(ScoutError::Config(_))));
    }

    #[test]
    fn toml_round_trip_with_strategy_table() {
        let toml_src = r#"
            min_area = 20.0
            max_area = 9000.0
            margin = 3

            [segmentation]
            strategy = "edges"
            low_threshold = 40.0
            high_threshold = 120.0

            [closing]
            kernel_width = 7
            kernel_height = 5
        "#;
        let cfg: DetectionConfig = toml::from_str(toml_src).unwrap();
        cfg.validate().unwrap();
        assert!(matches!(
            cfg.segmentation,
            SegmentationConfig::Edges {
                low_threshold,
                high_threshold,
            } if low_threshold == 40.0 && high_threshold == 120.0
        ));
        assert_eq!(cfg.closing.kernel_width, 7);
        assert_eq!(cfg.closing.iterations, 1);
        assert_eq!(cfg.margin, 3);
        assert_eq!(cfg.min_confidence, 0.85);
    }
}
