//! Normalized box to pixel rectangle resolution.

use facemark_models::{FaceEntry, PixelRect, StoredFace};
use tracing::debug;

/// Resolve a face entry's bounding box against an image of
/// `image_height` x `image_width` pixels.
///
/// Returns `None` when the box is absent, `{}` or incomplete; the caller skips
/// such entries. No clamping is done here, see [`PixelRect::clip`].
pub fn resolve(entry: &FaceEntry, image_height: u32, image_width: u32) -> Option<PixelRect> {
    let Some(normalized) = entry.normalized_box() else {
        debug!("Skipping face without a complete bounding box");
        return None;
    };
    Some(normalized.to_pixels(image_height, image_width))
}

/// Same as [`resolve`] for a stored-labels face.
pub fn resolve_stored(face: &StoredFace, image_height: u32, image_width: u32) -> Option<PixelRect> {
    face.normalized_box()
        .map(|normalized| normalized.to_pixels(image_height, image_width))
}

/// Detector output is already in pixels; wrap it without any scaling.
pub fn resolve_pixels(x: i32, y: i32, width: u32, height: u32) -> PixelRect {
    PixelRect::new(x, y, width as i32, height as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facemark_models::{BoundingBox, StoredBoundingBox};

    fn entry_with_box(b: Option<BoundingBox>) -> FaceEntry {
        FaceEntry {
            bounding_box: b,
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_truncates_fractions() {
        let entry = entry_with_box(Some(BoundingBox::new(0.25, 0.5, 0.1, 0.2)));
        let rect = resolve(&entry, 600, 1000).unwrap();
        assert_eq!(rect, PixelRect::new(250, 300, 100, 120));
    }

    #[test]
    fn test_resolve_is_floor_not_round() {
        let entry = entry_with_box(Some(BoundingBox::new(0.0019, 0.0999, 0.5, 0.5)));
        let rect = resolve(&entry, 1000, 1000).unwrap();
        assert_eq!(rect.x, 1);
        assert_eq!(rect.y, 99);
    }

    #[test]
    fn test_resolve_skips_missing_box() {
        assert!(resolve(&entry_with_box(None), 100, 100).is_none());
    }

    #[test]
    fn test_resolve_skips_empty_box() {
        let entry = entry_with_box(Some(BoundingBox::default()));
        assert!(resolve(&entry, 100, 100).is_none());
    }

    #[test]
    fn test_resolve_does_not_clamp() {
        let entry = entry_with_box(Some(BoundingBox::new(0.9, 0.9, 0.5, 0.5)));
        let rect = resolve(&entry, 100, 100).unwrap();
        assert_eq!(rect, PixelRect::new(90, 90, 50, 50));
    }

    #[test]
    fn test_resolve_pixels_passthrough() {
        assert_eq!(resolve_pixels(-3, 4, 10, 12), PixelRect::new(-3, 4, 10, 12));
    }

    #[test]
    fn test_resolve_stored() {
        let face = StoredFace {
            bounding_box: Some(StoredBoundingBox {
                left: 0.5,
                top: 0.25,
                width: 0.25,
                height: 0.5,
            }),
            name: None,
        };
        assert_eq!(
            resolve_stored(&face, 200, 400),
            Some(PixelRect::new(200, 50, 100, 100))
        );
    }
}
