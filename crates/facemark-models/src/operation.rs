//! Named operations and transform kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Record-driven operations.
///
/// Each can be requested by name or by its menu digit ("1".."5").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Blur every face in the record
    Blur,
    /// Blur faces whose lower age bound is under 18
    BlurUnder18,
    /// Outline faces colored by age/gender with emotion labels
    SquareFace,
    /// Ask for a name per face, outline, label and persist the record
    ApplyLabels,
    /// Render names and boxes from a stored-labels XML file
    ApplyStoredLabels,
}

impl Operation {
    pub const ALL: &'static [Operation] = &[
        Operation::Blur,
        Operation::BlurUnder18,
        Operation::SquareFace,
        Operation::ApplyLabels,
        Operation::ApplyStoredLabels,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Blur => "blur",
            Operation::BlurUnder18 => "blur_under_18",
            Operation::SquareFace => "square_face",
            Operation::ApplyLabels => "apply_labels",
            Operation::ApplyStoredLabels => "apply_stored_labels",
        }
    }

    /// Menu position, 1-based.
    pub fn menu_digit(&self) -> char {
        match self {
            Operation::Blur => '1',
            Operation::BlurUnder18 => '2',
            Operation::SquareFace => '3',
            Operation::ApplyLabels => '4',
            Operation::ApplyStoredLabels => '5',
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        Operation::ALL
            .iter()
            .copied()
            .find(|op| {
                op.as_str() == trimmed || (trimmed.len() == 1 && trimmed.starts_with(op.menu_digit()))
            })
            .ok_or_else(|| InvalidOption(s.to_string()))
    }
}

/// Pixel transforms that need no detection record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Rotate180,
    Negative,
    Grayscale,
    Mirror,
    MirrorHalfVertical,
    MirrorHalfHorizontal,
    EvenDimensions,
    DrawBox,
    InvertRegion,
    BlurBox,
    BoxWithText,
}

impl TransformKind {
    pub const ALL: &'static [TransformKind] = &[
        TransformKind::Rotate180,
        TransformKind::Negative,
        TransformKind::Grayscale,
        TransformKind::Mirror,
        TransformKind::MirrorHalfVertical,
        TransformKind::MirrorHalfHorizontal,
        TransformKind::EvenDimensions,
        TransformKind::DrawBox,
        TransformKind::InvertRegion,
        TransformKind::BlurBox,
        TransformKind::BoxWithText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Rotate180 => "rotate_180",
            TransformKind::Negative => "negative",
            TransformKind::Grayscale => "grayscale",
            TransformKind::Mirror => "mirror",
            TransformKind::MirrorHalfVertical => "mirror_half_vertical",
            TransformKind::MirrorHalfHorizontal => "mirror_half_horizontal",
            TransformKind::EvenDimensions => "even_dimensions",
            TransformKind::DrawBox => "draw_box",
            TransformKind::InvertRegion => "invert_region",
            TransformKind::BlurBox => "blur_box",
            TransformKind::BoxWithText => "box_with_text",
        }
    }

    /// Whether the transform needs two corner points.
    pub fn requires_region(&self) -> bool {
        matches!(
            self,
            TransformKind::DrawBox
                | TransformKind::InvertRegion
                | TransformKind::BlurBox
                | TransformKind::BoxWithText
        )
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransformKind {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        TransformKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| InvalidOption(s.to_string()))
    }
}

/// An operation or transform name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid option: {0}")]
pub struct InvalidOption(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_by_name_and_digit() {
        assert_eq!("blur".parse::<Operation>().unwrap(), Operation::Blur);
        assert_eq!("BLUR_UNDER_18".parse::<Operation>().unwrap(), Operation::BlurUnder18);
        assert_eq!("3".parse::<Operation>().unwrap(), Operation::SquareFace);
        assert_eq!(" 4 ".parse::<Operation>().unwrap(), Operation::ApplyLabels);
        assert_eq!("5".parse::<Operation>().unwrap(), Operation::ApplyStoredLabels);
    }

    #[test]
    fn test_operation_invalid() {
        assert_eq!("6".parse::<Operation>(), Err(InvalidOption("6".to_string())));
        assert!("".parse::<Operation>().is_err());
        assert!("blurry".parse::<Operation>().is_err());
    }

    #[test]
    fn test_operation_display_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.to_string().parse::<Operation>().unwrap(), *op);
        }
    }

    #[test]
    fn test_transform_parse() {
        assert_eq!("mirror".parse::<TransformKind>().unwrap(), TransformKind::Mirror);
        assert!("sepia".parse::<TransformKind>().is_err());
        assert!(TransformKind::BlurBox.requires_region());
        assert!(!TransformKind::Negative.requires_region());
    }
}
