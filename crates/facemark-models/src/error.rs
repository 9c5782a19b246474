//! Error types for record parsing.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while reading or writing detection records.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The face list is missing or empty. Always fatal for the invocation.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::DeError),

    #[error("XML write error: {0}")]
    XmlWrite(String),
}

impl ModelError {
    /// Create a malformed record error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRecord(message.into())
    }

    /// Whether this error means the record had no faces to work on.
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, ModelError::MalformedRecord(_))
    }
}
