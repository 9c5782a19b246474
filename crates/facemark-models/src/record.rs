//! Face-detection records.
//!
//! The wire format is the detector's own JSON shape with PascalCase keys:
//!
//! ```json
//! {"FaceDetails": [{"BoundingBox": {"Left": 0.1, "Top": 0.2, "Width": 0.3, "Height": 0.4},
//!                   "AgeRange": {"Low": 20, "High": 30},
//!                   "Gender": {"Value": "Female"},
//!                   "Emotions": [{"Type": "HAPPY", "Confidence": 98.1}]}]}
//! ```
//!
//! Keys this crate does not model (landmarks, pose, quality, response
//! metadata) are kept in `extra` maps so a record written back out loses
//! nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, ModelResult};
use crate::rect::NormalizedRect;

/// Top-level key holding the face list.
pub const FACE_DETAILS_KEY: &str = "FaceDetails";

/// A parsed detection record. Never empty once returned by [`DetectionRecord::parse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    #[serde(rename = "FaceDetails", default)]
    pub faces: Vec<FaceEntry>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DetectionRecord {
    /// Parse and validate a JSON detection record.
    ///
    /// Fails with [`ModelError::MalformedRecord`] when `FaceDetails` is
    /// absent or empty. Individual entries are not validated here.
    pub fn parse(raw: &str) -> ModelResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    /// Same as [`DetectionRecord::parse`] for an already decoded JSON value.
    pub fn from_value(value: Value) -> ModelResult<Self> {
        let has_faces = value
            .get(FACE_DETAILS_KEY)
            .and_then(Value::as_array)
            .map(|faces| !faces.is_empty())
            .unwrap_or(false);

        if !has_faces {
            return Err(ModelError::malformed(format!(
                "`{}` is missing or empty",
                FACE_DETAILS_KEY
            )));
        }

        let record: DetectionRecord = serde_json::from_value(value)?;
        tracing::debug!(faces = record.faces.len(), "Parsed detection record");
        Ok(record)
    }

    /// Serialize with 4-space indentation.
    pub fn to_pretty_json(&self) -> ModelResult<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// One detected subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FaceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<AgeRange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emotions: Vec<Emotion>,

    /// Assigned by the labeling workflow, never by the detector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FaceEntry {
    /// Lower age bound, 0 when unknown.
    pub fn age_low(&self) -> i64 {
        self.age_range.as_ref().and_then(|a| a.low).unwrap_or(0)
    }

    /// Upper age bound, 100 when unknown.
    pub fn age_high(&self) -> i64 {
        self.age_range.as_ref().and_then(|a| a.high).unwrap_or(100)
    }

    pub fn gender_value(&self) -> Option<&str> {
        self.gender.as_ref().and_then(|g| g.value.as_deref())
    }

    /// The bounding box when all four fractions are present.
    pub fn normalized_box(&self) -> Option<NormalizedRect> {
        self.bounding_box.as_ref().and_then(BoundingBox::to_normalized)
    }
}

/// Normalized bounding box as written by the detector.
///
/// Every field is optional on the wire so that `{}` parses; an incomplete
/// box is treated as no box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none() && self.width.is_none() && self.height.is_none()
    }

    pub fn to_normalized(&self) -> Option<NormalizedRect> {
        Some(NormalizedRect::new(
            self.left?,
            self.top?,
            self.width?,
            self.height?,
        ))
    }
}

impl From<NormalizedRect> for BoundingBox {
    fn from(rect: NormalizedRect) -> Self {
        Self::new(rect.x, rect.y, rect.width, rect.height)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AgeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<i64>,
}

impl AgeRange {
    pub fn new(low: i64, high: i64) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
        }
    }
}

/// Detector gender guess. `Value` is an open set ("Male", "Female", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Gender {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Gender {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            confidence: None,
        }
    }
}

/// One emotion guess with confidence in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Emotion {
    #[serde(rename = "Type")]
    pub kind: String,
    pub confidence: f64,
}

impl Emotion {
    pub fn new(kind: impl Into<String>, confidence: f64) -> Self {
        Self {
            kind: kind.into(),
            confidence,
        }
    }
}
