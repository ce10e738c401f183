//! Error types for the predictor library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the prediction pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// The image file is missing, unreadable or not decodable.
    #[error("failed to read image from {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image is too small for the fixed footer/window crop.
    #[error("unsupported image dimensions {width}x{height}: {reason}")]
    Geometry {
        width: u32,
        height: u32,
        reason: String,
    },

    /// The crop window has a single intensity, so min-max scaling is undefined.
    #[error("image window has constant intensity {value}; cannot normalize")]
    DegenerateImage { value: u8 },

    /// User input could not be accepted.
    #[error("invalid input {input:?}: {reason}")]
    Validation { input: String, reason: String },

    /// Tensor shape does not match the model topology.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// The weights blob is missing or does not fit the network.
    #[error("failed to load model weights from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    /// The network produced NaN or an infinity.
    #[error("model produced a non-finite prediction ({0})")]
    NonFinitePrediction(f32),

    /// The settings file exists but is malformed.
    #[error("invalid settings file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for predictor operations.
pub type Result<T> = std::result::Result<T, Error>;
