#![deny(unreachable_patterns)]
//! Face annotation and redaction on raster images.
//!
//! This crate provides:
//! - Geometry resolution from normalized boxes to pixel rectangles
//! - A pure policy engine turning face attributes into draw instructions
//! - A `Canvas` port with an `image`/`imageproc` implementation
//! - Record-driven workflows (blur, outline, labeling, stored labels)
//! - Local face detection through `rustface` and a frame-by-frame live loop
//! - Whole-image transforms and an HTML comparison page

pub mod canvas;
pub mod detection;
pub mod error;
pub mod font;
pub mod fs_utils;
pub mod geometry;
pub mod html;
pub mod instruction;
pub mod live;
pub mod metrics;
pub mod policy;
pub mod service;
pub mod transforms;
pub mod workflows;

pub use canvas::{apply, Canvas, RecordingCanvas};
pub use detection::{detect_in_rgb, FaceDetector, FixedFaceDetector};
#[cfg(feature = "rustface")]
pub use detection::{SeetaConfig, SeetaFaceDetector};
pub use error::{MediaError, MediaResult};
pub use fs_utils::{
    commit_all, load_image, normalize_output_path, read_record, read_stored_labels, save_image,
    stage_image, stage_record, stage_stored_labels, write_stored_labels, StagedFile,
    DEFAULT_IMAGE_EXTENSION,
};
pub use geometry::{resolve, resolve_pixels, resolve_stored};
pub use html::{comparison_page, write_comparison, ComparisonOutput};
pub use instruction::{Anchor, BlurKind, DrawInstruction};
pub use live::{
    run_live, DirectoryFrameSink, DirectoryFrameSource, FrameSink, FrameSource, LiveMode,
    LiveStats, LoopControl,
};
pub use policy::{
    emotion_summary, is_minor_by_upper_bound, is_under_18, label_anchor, secondary_label_anchor,
    AnnotationDecision, BlurFilter, MarkOptions, MinorPredicate, Palette, WorkflowPolicy,
};
pub use service::{process, ProcessOutcome, ProcessRequest};
pub use transforms::{apply_transform, Axis, TransformArgs};
pub use workflows::{
    apply_labels, apply_stored_labels, blur_faces, blur_under_18_faces, detect_and_mark,
    mark_faces, redact_faces, square_faces, FixedLabels, Labeler, WorkflowSummary,
};
