//! Drawing instructions emitted by the policy engine.

use facemark_models::{Color, PixelRect};

/// Text origin: left edge and baseline, in pixels. May be off-canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
}

impl Anchor {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Smoothing filter used to de-identify a region.
///
/// Both variants are strong enough that facial features cannot be recovered;
/// they are not cosmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlurKind {
    Gaussian { sigma: f32 },
    Median { radius: u32 },
}

impl BlurKind {
    /// Redaction of record-driven faces and live frames.
    pub const REDACTION: BlurKind = BlurKind::Gaussian { sigma: 30.0 };

    /// Redaction of cascade-detected faces and manual boxes (99px median).
    pub const CASCADE: BlurKind = BlurKind::Median { radius: 49 };
}

/// One pixel mutation, applied in order by a [`crate::canvas::Canvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawInstruction {
    Blur {
        rect: PixelRect,
        kind: BlurKind,
    },
    Rectangle {
        rect: PixelRect,
        color: Color,
        thickness: u32,
    },
    Text {
        text: String,
        anchor: Anchor,
        color: Color,
    },
}

impl DrawInstruction {
    pub fn is_blur(&self) -> bool {
        matches!(self, DrawInstruction::Blur { .. })
    }

    /// Action label used in metrics.
    pub fn action(&self) -> &'static str {
        match self {
            DrawInstruction::Blur { .. } => "blur",
            DrawInstruction::Rectangle { .. } => "rectangle",
            DrawInstruction::Text { .. } => "text",
        }
    }
}
