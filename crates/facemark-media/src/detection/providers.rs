//! Face detector port.

use facemark_models::PixelRect;
use image::{GrayImage, RgbImage};

use crate::error::MediaResult;

/// Face detection provider.
///
/// Takes a grayscale frame and returns pixel rectangles. Detector state (for
/// example a loaded cascade) may be mutated between calls, hence `&mut self`.
pub trait FaceDetector {
    /// Detect faces in a grayscale image.
    fn detect(&mut self, gray: &GrayImage) -> MediaResult<Vec<PixelRect>>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

impl<D: FaceDetector + ?Sized> FaceDetector for Box<D> {
    fn detect(&mut self, gray: &GrayImage) -> MediaResult<Vec<PixelRect>> {
        (**self).detect(gray)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Convert to grayscale and run the detector.
pub fn detect_in_rgb<D: FaceDetector + ?Sized>(
    detector: &mut D,
    img: &RgbImage,
) -> MediaResult<Vec<PixelRect>> {
    let gray = image::imageops::grayscale(img);
    let faces = detector.detect(&gray)?;
    tracing::debug!(detector = detector.name(), faces = faces.len(), "Detected faces");
    Ok(faces)
}

/// Detector returning a fixed list of rectangles for every frame.
///
/// Stands in for a real detector where none is available.
#[derive(Debug, Clone, Default)]
pub struct FixedFaceDetector {
    pub faces: Vec<PixelRect>,
}

impl FixedFaceDetector {
    pub fn new(faces: Vec<PixelRect>) -> Self {
        Self { faces }
    }
}

impl FaceDetector for FixedFaceDetector {
    fn detect(&mut self, _gray: &GrayImage) -> MediaResult<Vec<PixelRect>> {
        Ok(self.faces.clone())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
