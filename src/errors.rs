use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Input error: {0}")]
    Input(String),

    #[error("Unsupported channel count: {0} (expected 3 or 4)")]
    UnsupportedChannelCount(u8),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid threshold order: low {low} must be below high {high}")]
    InvalidThresholdOrder { low: f32, high: f32 },

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type ScoutResult<T> = Result<T, ScoutError>;
