//! Shared data models for facemark.
//!
//! This crate provides Serde-serializable types for:
//! - Face-detection records (JSON) and stored-labels records (XML)
//! - Normalized and pixel-space rectangles
//! - Annotation colors
//! - Operation and transform names

pub mod color;
pub mod error;
pub mod operation;
pub mod record;
pub mod rect;
pub mod stored_labels;

// Re-export common types
pub use color::Color;
pub use error::{ModelError, ModelResult};
pub use operation::{InvalidOption, Operation, TransformKind};
pub use record::{AgeRange, BoundingBox, DetectionRecord, Emotion, FaceEntry, Gender};
pub use rect::{ClippedRect, NormalizedRect, PixelRect};
pub use stored_labels::{StoredBoundingBox, StoredFace, StoredLabelsRecord, DEFAULT_STORED_NAME};
