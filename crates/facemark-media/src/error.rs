//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

use facemark_models::{InvalidOption, ModelError};

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while processing an image.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Failed to decode image {path}: {message}")]
    DecodeFailed { path: PathBuf, message: String },

    #[error("Failed to encode image {path}: {message}")]
    EncodeFailed { path: PathBuf, message: String },

    #[error("Record error: {0}")]
    Record(#[from] ModelError),

    #[error(transparent)]
    InvalidOption(#[from] InvalidOption),

    #[error("Record file not found: {0}")]
    RecordNotFound(PathBuf),

    #[error("Face detection failed: {0}")]
    DetectionFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Labeling failed: {0}")]
    LabelingFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create a detection failure error.
    pub fn detection_failed(message: impl Into<String>) -> Self {
        Self::DetectionFailed(message.into())
    }

    /// Create a model not found error.
    pub fn model_not_found(path: impl Into<String>) -> Self {
        Self::ModelNotFound(path.into())
    }

    /// Create a labeling failure error.
    pub fn labeling_failed(message: impl Into<String>) -> Self {
        Self::LabelingFailed(message.into())
    }

    pub fn decode_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DecodeFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn encode_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::EncodeFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the record had no faces to annotate.
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, MediaError::Record(e) if e.is_malformed_record())
    }
}
