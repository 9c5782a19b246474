//! Pixel-editing port and its raster implementation.

use facemark_models::{Color, PixelRect};
use image::{Rgb, RgbImage};
use imageproc::rect::Rect;
use tracing::trace;

use crate::font;
use crate::instruction::{Anchor, BlurKind, DrawInstruction};
use crate::metrics;

/// Pixel primitives the policy engine's instructions are applied through.
///
/// Rectangles may extend past the edge; implementations drop what does not
/// fit instead of failing.
pub trait Canvas {
    /// (width, height) in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Outline from `(x, y)` to `(x + width, y + height)` inclusive.
    fn draw_rectangle(&mut self, rect: PixelRect, color: Color, thickness: u32);

    fn draw_text(&mut self, text: &str, anchor: Anchor, color: Color);

    /// Replace the region with a blurred copy of itself.
    fn blur_region(&mut self, rect: PixelRect, kind: BlurKind);
}

/// Apply instructions in order.
pub fn apply<C: Canvas + ?Sized>(canvas: &mut C, instructions: &[DrawInstruction]) {
    for instruction in instructions {
        trace!(?instruction, "Applying draw instruction");
        match instruction {
            DrawInstruction::Blur { rect, kind } => canvas.blur_region(*rect, *kind),
            DrawInstruction::Rectangle {
                rect,
                color,
                thickness,
            } => canvas.draw_rectangle(*rect, *color, *thickness),
            DrawInstruction::Text {
                text,
                anchor,
                color,
            } => {
                if !text.is_empty() {
                    canvas.draw_text(text, *anchor, *color);
                }
            }
        }
        metrics::record_action(instruction.action());
    }
}

pub(crate) fn to_rgb(color: Color) -> Rgb<u8> {
    Rgb(color.to_array())
}

impl Canvas for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn draw_rectangle(&mut self, rect: PixelRect, color: Color, thickness: u32) {
        let color = to_rgb(color);
        let (max_x, max_y) = (i64::from(self.width()), i64::from(self.height()));
        let (x0, y0) = (i64::from(rect.x), i64::from(rect.y));
        let (x1, y1) = (x0 + i64::from(rect.width), y0 + i64::from(rect.height));

        // Rings grow inwards from the outer edge
        for ring in 0..i64::from(thickness.max(1)) {
            let (left, top, right, bottom) = (x0 + ring, y0 + ring, x1 - ring, y1 - ring);
            if right < left || bottom < top {
                break;
            }
            // Edges past the image are pulled to one pixel outside it, so
            // they stay invisible and the outline size stays bounded.
            let (left, top) = (left.max(-1), top.max(-1));
            let (right, bottom) = (right.min(max_x), bottom.min(max_y));
            if right < left || bottom < top {
                continue;
            }
            let outline = Rect::at(left as i32, top as i32)
                .of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
            imageproc::drawing::draw_hollow_rect_mut(self, outline, color);
        }
    }

    fn draw_text(&mut self, text: &str, anchor: Anchor, color: Color) {
        font::draw_text(self, text, anchor, to_rgb(color), font::DEFAULT_SCALE);
    }

    fn blur_region(&mut self, rect: PixelRect, kind: BlurKind) {
        let Some(clip) = rect.clip(self.width(), self.height()) else {
            return;
        };

        let region = image::imageops::crop_imm(&*self, clip.x, clip.y, clip.width, clip.height).to_image();
        let blurred = match kind {
            BlurKind::Gaussian { sigma } if sigma > 0.0 => {
                imageproc::filter::gaussian_blur_f32(&region, sigma)
            }
            BlurKind::Median { radius } if radius > 0 => {
                imageproc::filter::median_filter(&region, radius, radius)
            }
            _ => return,
        };
        image::imageops::replace(self, &blurred, i64::from(clip.x), i64::from(clip.y));
    }
}

/// Canvas that only records what it was asked to do.
///
/// Useful for checking instruction streams without touching pixels.
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    pub width: u32,
    pub height: u32,
    pub calls: Vec<DrawInstruction>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }
}

impl Canvas for RecordingCanvas {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_rectangle(&mut self, rect: PixelRect, color: Color, thickness: u32) {
        self.calls.push(DrawInstruction::Rectangle {
            rect,
            color,
            thickness,
        });
    }

    fn draw_text(&mut self, text: &str, anchor: Anchor, color: Color) {
        self.calls.push(DrawInstruction::Text {
            text: text.to_string(),
            anchor,
            color,
        });
    }

    fn blur_region(&mut self, rect: PixelRect, kind: BlurKind) {
        self.calls.push(DrawInstruction::Blur { rect, kind });
    }
}
