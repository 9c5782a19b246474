//! Stored-labels record: the XML format written after faces were named.
//!
//! ```xml
//! <Faces>
//!   <Face>
//!     <BoundingBox><Left>0.1</Left><Top>0.2</Top><Width>0.3</Width><Height>0.4</Height></BoundingBox>
//!     <Name>Ana</Name>
//!   </Face>
//! </Faces>
//! ```
//!
//! The root element name is not checked when reading.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::record::{BoundingBox, DetectionRecord};
use crate::rect::NormalizedRect;

/// Name used when a `Face` node carries no `Name`.
pub const DEFAULT_STORED_NAME: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "Faces")]
pub struct StoredLabelsRecord {
    #[serde(rename = "Face", default)]
    pub faces: Vec<StoredFace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoredFace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<StoredBoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Text-encoded box; all four values are required on a present node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StoredBoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl StoredLabelsRecord {
    /// Parse a stored-labels document. Zero `Face` nodes is a malformed record.
    pub fn parse(raw: &str) -> ModelResult<Self> {
        let record: StoredLabelsRecord = quick_xml::de::from_str(raw)?;
        if record.faces.is_empty() {
            return Err(ModelError::malformed("no `Face` nodes in stored labels"));
        }
        tracing::debug!(faces = record.faces.len(), "Parsed stored labels");
        Ok(record)
    }

    /// Convert a labeled detection record. Entries without a complete box
    /// cannot be rendered and are left out.
    pub fn from_detection_record(record: &DetectionRecord) -> Self {
        let faces = record
            .faces
            .iter()
            .filter_map(|face| {
                face.normalized_box().map(|rect| StoredFace {
                    bounding_box: Some(StoredBoundingBox::from(rect)),
                    name: face.name.clone(),
                })
            })
            .collect();
        Self { faces }
    }

    pub fn to_xml(&self) -> ModelResult<String> {
        quick_xml::se::to_string(self).map_err(|e| ModelError::XmlWrite(e.to_string()))
    }
}

impl StoredFace {
    /// The stored name, or [`DEFAULT_STORED_NAME`].
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_STORED_NAME)
    }

    pub fn normalized_box(&self) -> Option<NormalizedRect> {
        self.bounding_box.map(NormalizedRect::from)
    }
}

impl From<StoredBoundingBox> for NormalizedRect {
    fn from(b: StoredBoundingBox) -> Self {
        NormalizedRect::new(b.left, b.top, b.width, b.height)
    }
}

impl From<NormalizedRect> for StoredBoundingBox {
    fn from(r: NormalizedRect) -> Self {
        Self {
            left: r.x,
            top: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

impl From<StoredBoundingBox> for BoundingBox {
    fn from(b: StoredBoundingBox) -> Self {
        BoundingBox::new(b.left, b.top, b.width, b.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FaceEntry;

    #[test]
    fn test_parse_with_default_name() {
        let xml = r#"<Labels>
            <Face>
                <BoundingBox><Left>0.1</Left><Top>0.2</Top><Width>0.3</Width><Height>0.4</Height></BoundingBox>
                <Name>Ana</Name>
            </Face>
            <Face>
                <BoundingBox><Left>0.5</Left><Top>0.5</Top><Width>0.1</Width><Height>0.1</Height></BoundingBox>
            </Face>
        </Labels>"#;

        let record = StoredLabelsRecord::parse(xml).unwrap();
        assert_eq!(record.faces.len(), 2);
        assert_eq!(record.faces[0].display_name(), "Ana");
        assert_eq!(record.faces[1].display_name(), "Unknown");
        assert_eq!(
            record.faces[0].normalized_box(),
            Some(NormalizedRect::new(0.1, 0.2, 0.3, 0.4))
        );
    }

    #[test]
    fn test_no_faces_is_malformed() {
        let err = StoredLabelsRecord::parse("<Faces></Faces>").unwrap_err();
        assert!(err.is_malformed_record());
    }

    #[test]
    fn test_xml_write_then_read() {
        let record = DetectionRecord {
            faces: vec![
                FaceEntry {
                    bounding_box: Some(BoundingBox::new(0.25, 0.125, 0.5, 0.3)),
                    name: Some("Luis".to_string()),
                    ..Default::default()
                },
                FaceEntry::default(),
            ],
            extra: Default::default(),
        };

        let stored = StoredLabelsRecord::from_detection_record(&record);
        let xml = stored.to_xml().unwrap();
        assert!(xml.starts_with("<Faces>"));

        let reread = StoredLabelsRecord::parse(&xml).unwrap();
        assert_eq!(reread, stored);
        assert_eq!(reread.faces.len(), 1);
        assert_eq!(reread.faces[0].display_name(), "Luis");
    }
}
