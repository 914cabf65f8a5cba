//! Error types for detection and clustering.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the detection and clustering pipelines.
///
/// Internal consistency failures (a normalized feature outside `(-1, 1)`,
/// an out-of-range index during containment checks) are not represented
/// here: they are assertions.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: &'static str },

    #[error("Dimension mismatch: scene is {scene:?}, background is {background:?}")]
    DimensionMismatch {
        scene: (u32, u32),
        background: (u32, u32),
    },

    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
