use serde::{Deserialize, Serialize};

/// A box given as fractions of the image size, origin at the top-left.
///
/// Components are not range-checked. Anything outside `[0, 1]` converts to a
/// pixel rectangle that runs past the image, saturating at the `i32` limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Convert to pixel space against an image of `image_width` x `image_height`.
    ///
    /// Each component is truncated, never rounded, so `0.25 * 1000` gives 250
    /// and `0.2999 * 1000` gives 299.
    pub fn to_pixels(&self, image_height: u32, image_width: u32) -> PixelRect {
        let w = f64::from(image_width);
        let h = f64::from(image_height);
        PixelRect {
            x: (self.x * w) as i32,
            y: (self.y * h) as i32,
            width: (self.width * w) as i32,
            height: (self.height * h) as i32,
        }
    }
}

/// An integer rectangle in image-pixel space.
///
/// Not clamped: a rectangle may extend past the image edge. Use
/// [`PixelRect::clip`] before touching pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Build from two corners, in any order.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        let x = a.0.min(b.0);
        let y = a.1.min(b.1);
        Self {
            x,
            y,
            width: i32::try_from(a.0.abs_diff(b.0)).unwrap_or(i32::MAX),
            height: i32::try_from(a.1.abs_diff(b.1)).unwrap_or(i32::MAX),
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersect with an image of the given size.
    ///
    /// Mirrors array-slice semantics: whatever lies past the edge is dropped.
    /// Returns `None` when nothing of the rectangle is inside the image.
    pub fn clip(&self, image_width: u32, image_height: u32) -> Option<ClippedRect> {
        let max_x = i64::from(image_width);
        let max_y = i64::from(image_height);

        let x0 = i64::from(self.x).clamp(0, max_x);
        let y0 = i64::from(self.y).clamp(0, max_y);
        let x1 = i64::from(self.right()).clamp(0, max_x);
        let y1 = i64::from(self.bottom()).clamp(0, max_y);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(ClippedRect {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}

/// A non-empty rectangle guaranteed to lie inside some image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixels_truncates() {
        let rect = NormalizedRect::new(0.25, 0.1, 0.3333, 0.5);
        let px = rect.to_pixels(480, 1000);
        assert_eq!(px, PixelRect::new(250, 48, 333, 240));
    }

    #[test]
    fn test_to_pixels_never_rounds_up() {
        let rect = NormalizedRect::new(0.2999, 0.0999, 0.0019, 0.0019);
        let px = rect.to_pixels(1000, 1000);
        assert_eq!(px, PixelRect::new(299, 99, 1, 1));
    }

    #[test]
    fn test_from_corners_any_order() {
        let a = PixelRect::from_corners((50, 80), (10, 20));
        assert_eq!(a, PixelRect::new(10, 20, 40, 60));
    }

    #[test]
    fn test_clip_truncates_past_edge() {
        let rect = PixelRect::new(90, 90, 50, 50);
        let clipped = rect.clip(100, 120).unwrap();
        assert_eq!(clipped.width, 10);
        assert_eq!(clipped.height, 30);
    }

    #[test]
    fn test_clip_outside_is_none() {
        assert!(PixelRect::new(200, 10, 5, 5).clip(100, 100).is_none());
        assert!(PixelRect::new(10, 10, 0, 5).clip(100, 100).is_none());
    }

    #[test]
    fn test_clip_negative_origin() {
        let clipped = PixelRect::new(-5, -5, 10, 10).clip(100, 100).unwrap();
        assert_eq!((clipped.x, clipped.y, clipped.width, clipped.height), (0, 0, 5, 5));
    }

    #[test]
    fn test_to_pixels_saturates_out_of_range() {
        let px = NormalizedRect::new(0.5, 0.5, 5_000_000.0, 5_000_000.0).to_pixels(1000, 1000);
        assert_eq!(px, PixelRect::new(500, 500, i32::MAX, i32::MAX));
        assert_eq!(px.right(), i32::MAX);
    }

    #[test]
    fn test_from_corners_extremes() {
        let rect = PixelRect::from_corners((i32::MIN, 0), (i32::MAX, 10));
        assert_eq!(rect.x, i32::MIN);
        assert_eq!(rect.width, i32::MAX);
    }
}
