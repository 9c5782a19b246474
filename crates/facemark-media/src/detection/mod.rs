//! Local face detection.
//!
//! | Backend | Feature | Model |
//! |---------|---------|-------|
//! | `SeetaFaceDetector` | `rustface` | `seeta_fd_frontal_v1.0.bin` |
//! | `FixedFaceDetector` | — | none, returns preset boxes |
//!
//! Anything else can plug in through the [`FaceDetector`] trait.

pub mod providers;
#[cfg(feature = "rustface")]
pub mod seeta;

pub use providers::{detect_in_rgb, FaceDetector, FixedFaceDetector};
#[cfg(feature = "rustface")]
pub use seeta::{SeetaConfig, SeetaFaceDetector};
