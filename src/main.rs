use uiscout::config;
use uiscout::perception::locate;
use uiscout::perception::screenshot::{acquire_first, ImageSource};
use uiscout::{run_detection, DetectionConfig, ScoutResult};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "no usable config.toml, using adaptive-threshold defaults");
            DetectionConfig::default()
        }
    };

    // Candidate sources in order: image path arguments first, then the live
    // screen if requested (or as the default when no path is given).
    let mut sources = Vec::new();
    let mut relocate = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--live" => sources.push(ImageSource::PrimaryScreen),
            "--relocate" => relocate = true,
            path => sources.push(ImageSource::File(path.into())),
        }
    }
    if sources.is_empty() {
        sources.push(ImageSource::PrimaryScreen);
    }

    if let Err(e) = run(&cfg, &sources, relocate) {
        tracing::error!(error = %e, "detection run failed");
        std::process::exit(1);
    }
}

fn run(cfg: &DetectionConfig, sources: &[ImageSource], relocate: bool) -> ScoutResult<()> {
    let image = acquire_first(sources)?;
    let report = run_detection(cfg, &image)?;
    for artifact in &report.artifacts {
        tracing::info!(
            index = artifact.index,
            bbox = ?artifact.region.bbox,
            path = %artifact.path.display(),
            "region exported"
        );
    }

    if relocate {
        let capture = ImageSource::PrimaryScreen.acquire()?;
        for (index, found) in locate::locate_all(&report.artifacts, &capture, cfg.min_confidence)? {
            match found {
                Some(m) => tracing::info!(
                    index,
                    bbox = ?m.bbox,
                    confidence = m.confidence,
                    "element found on screen"
                ),
                None => tracing::info!(index, "element not found on screen"),
            }
        }
    }
    Ok(())
}
