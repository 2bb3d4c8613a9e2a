use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("confidence threshold {0} is outside [0, 1]")]
    InvalidThreshold(f32),

    #[error("history capacity must be at least 1")]
    InvalidCapacity,

    #[error("minimum sample count must be at least 1")]
    InvalidMinSamples,

    #[error("calibration quad is degenerate, no homography exists")]
    DegenerateQuad,

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config Error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Replay Error: {0}")]
    Replay(#[from] serde_json::Error),
}
