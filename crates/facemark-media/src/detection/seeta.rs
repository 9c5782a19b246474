//! SeetaFace cascade detector backed by the `rustface` crate.

use std::path::Path;

use facemark_models::PixelRect;
use image::GrayImage;
use tracing::info;

use super::providers::FaceDetector;
use crate::error::{MediaError, MediaResult};
use crate::geometry::resolve_pixels;

/// Tuning knobs for the cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeetaConfig {
    pub min_face_size: u32,
    pub score_thresh: f64,
    pub pyramid_scale_factor: f32,
    pub slide_window_step: u32,
}

impl Default for SeetaConfig {
    fn default() -> Self {
        Self {
            min_face_size: 20,
            score_thresh: 2.0,
            pyramid_scale_factor: 0.8,
            slide_window_step: 4,
        }
    }
}

/// Face detector using the funnel-structured SeetaFace cascade.
pub struct SeetaFaceDetector {
    detector: Box<dyn rustface::Detector>,
}

impl SeetaFaceDetector {
    /// Load the model file (e.g. `seeta_fd_frontal_v1.0.bin`).
    pub fn from_path(model_path: impl AsRef<Path>, config: SeetaConfig) -> MediaResult<Self> {
        let model_path = model_path.as_ref();
        if !model_path.is_file() {
            return Err(MediaError::model_not_found(model_path.display().to_string()));
        }

        let path_str = model_path
            .to_str()
            .ok_or_else(|| MediaError::model_not_found(model_path.display().to_string()))?;
        let mut detector = rustface::create_detector(path_str)
            .map_err(|e| MediaError::detection_failed(format!("failed to load model: {}", e)))?;

        detector.set_min_face_size(config.min_face_size);
        detector.set_score_thresh(config.score_thresh);
        detector.set_pyramid_scale_factor(config.pyramid_scale_factor);
        detector.set_slide_window_step(config.slide_window_step, config.slide_window_step);

        info!(model = %model_path.display(), ?config, "Loaded SeetaFace model");
        Ok(Self { detector })
    }
}

impl FaceDetector for SeetaFaceDetector {
    fn detect(&mut self, gray: &GrayImage) -> MediaResult<Vec<PixelRect>> {
        let (width, height) = gray.dimensions();
        let image = rustface::ImageData::new(gray.as_raw(), width, height);

        let faces = self
            .detector
            .detect(&image)
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                resolve_pixels(bbox.x(), bbox.y(), bbox.width(), bbox.height())
            })
            .collect();
        Ok(faces)
    }

    fn name(&self) -> &'static str {
        "seetaface"
    }
}
