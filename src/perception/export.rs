use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::errors::ScoutResult;
use crate::perception::types::{Region, RegionArtifact};

/// Crops filtered regions from the source image and writes them out as
/// `0001.png`, `0002.png`, ... under the output directory.
///
/// The exporter owns the sequence counter: it starts at 1 and advances only
/// on successful writes, so artifact numbering stays dense and collision-free
/// for the lifetime of the exporter. Per-region failures are counted, logged
/// and skipped; they never abort the batch.
pub struct RegionExporter {
    output_dir: PathBuf,
    next_index: u32,
    skipped_empty_crop: u32,
    write_failures: u32,
}

impl RegionExporter {
    pub fn new(output_dir: impl AsRef<Path>) -> ScoutResult<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            next_index: 1,
            skipped_empty_crop: 0,
            write_failures: 0,
        })
    }

    /// Crop `region` from `source` with a symmetric margin (clamped to the
    /// image) and persist it. Returns `None` when the region was skipped.
    pub fn export(
        &mut self,
        region: &Region,
        source: &DynamicImage,
        margin: u32,
    ) -> Option<RegionArtifact> {
        let crop_box = region
            .bbox
            .expand_clamped(margin, source.width(), source.height());
        if crop_box.width == 0 || crop_box.height == 0 {
            self.skipped_empty_crop += 1;
            tracing::warn!(bbox = ?region.bbox, "skipping region with zero-area crop");
            return None;
        }

        let crop = source.crop_imm(crop_box.x, crop_box.y, crop_box.width, crop_box.height);
        let path = self.output_dir.join(format!("{:04}.png", self.next_index));
        if let Err(e) = crop.save(&path) {
            self.write_failures += 1;
            tracing::warn!(error = %e, path = %path.display(), "failed to write region artifact");
            return None;
        }

        let artifact = RegionArtifact {
            index: self.next_index,
            region: region.clone(),
            path,
        };
        self.next_index += 1;
        Some(artifact)
    }

    pub fn skipped_empty_crop(&self) -> u32 {
        self.skipped_empty_crop
    }

    pub fn write_failures(&self) -> u32 {
        self.write_failures
    }
}
