//! Record- and detector-driven annotation workflows.
//!
//! Each workflow walks the faces once, resolves rectangles, asks the policy
//! engine for instructions and applies them to a [`Canvas`]. Entries without
//! a usable box are skipped, never an error.

use facemark_models::{DetectionRecord, PixelRect, StoredLabelsRecord};
use image::RgbImage;
use tracing::{debug, info};

use crate::canvas::{apply, Canvas};
use crate::detection::{detect_in_rgb, FaceDetector};
use crate::error::MediaResult;
use crate::geometry::{resolve, resolve_stored};
use crate::instruction::DrawInstruction;
use crate::metrics;
use crate::policy::{
    labeling_instructions, mark_instructions, outline_instructions, redaction_instructions,
    stored_label_instructions, BlurFilter, MarkOptions,
};

/// Counts from one workflow run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowSummary {
    /// Faces that produced at least one instruction
    pub annotated: usize,
    /// Faces with a rectangle but nothing to do (e.g. filtered out of a blur)
    pub untouched: usize,
    /// Faces without a usable bounding box
    pub skipped: usize,
}

impl WorkflowSummary {
    fn count(&mut self, instructions: &[DrawInstruction]) {
        if instructions.is_empty() {
            self.untouched += 1;
        } else {
            self.annotated += 1;
        }
    }

    fn skip(&mut self, workflow: &'static str) {
        self.skipped += 1;
        metrics::record_skipped(workflow);
    }
}

/// Supplies a name for each face in the labeling workflow.
pub trait Labeler {
    /// `index` is the face's position in the record (0-based).
    fn label(&mut self, index: usize, rect: &PixelRect) -> MediaResult<String>;
}

impl<F> Labeler for F
where
    F: FnMut(usize, &PixelRect) -> MediaResult<String>,
{
    fn label(&mut self, index: usize, rect: &PixelRect) -> MediaResult<String> {
        self(index, rect)
    }
}

/// Hands out names in order; runs out to empty names.
#[derive(Debug, Clone, Default)]
pub struct FixedLabels {
    names: std::collections::VecDeque<String>,
}

impl FixedLabels {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Labeler for FixedLabels {
    fn label(&mut self, _index: usize, _rect: &PixelRect) -> MediaResult<String> {
        Ok(self.names.pop_front().unwrap_or_default())
    }
}

// =============================================================================
// Redaction
// =============================================================================

/// Blur faces the filter selects.
pub fn redact_faces<C: Canvas + ?Sized>(
    canvas: &mut C,
    record: &DetectionRecord,
    filter: BlurFilter,
) -> WorkflowSummary {
    let (width, height) = canvas.dimensions();
    let mut summary = WorkflowSummary::default();

    for face in &record.faces {
        let Some(rect) = resolve(face, height, width) else {
            summary.skip("redaction");
            continue;
        };
        let instructions = redaction_instructions(face, rect, filter);
        apply(canvas, &instructions);
        summary.count(&instructions);
    }

    info!(?filter, blurred = summary.annotated, skipped = summary.skipped, "Redaction done");
    summary
}

/// Blur every face.
pub fn blur_faces<C: Canvas + ?Sized>(canvas: &mut C, record: &DetectionRecord) -> WorkflowSummary {
    redact_faces(canvas, record, BlurFilter::All)
}

/// Blur faces whose lower age bound is under 18.
pub fn blur_under_18_faces<C: Canvas + ?Sized>(
    canvas: &mut C,
    record: &DetectionRecord,
) -> WorkflowSummary {
    redact_faces(canvas, record, BlurFilter::Under18)
}

// =============================================================================
// Outlines and labels
// =============================================================================

/// Outline each face colored by age/gender with its top emotions.
pub fn square_faces<C: Canvas + ?Sized>(canvas: &mut C, record: &DetectionRecord) -> WorkflowSummary {
    let (width, height) = canvas.dimensions();
    let mut summary = WorkflowSummary::default();

    for face in &record.faces {
        let Some(rect) = resolve(face, height, width) else {
            summary.skip("outline");
            continue;
        };
        let instructions = outline_instructions(face, rect);
        apply(canvas, &instructions);
        summary.count(&instructions);
    }

    info!(outlined = summary.annotated, skipped = summary.skipped, "Outline done");
    summary
}

/// Name each face, blur minors, outline and label.
///
/// Sets `Name` on every face that had a box; the caller persists the record.
pub fn apply_labels<C, L>(
    canvas: &mut C,
    record: &mut DetectionRecord,
    labeler: &mut L,
) -> MediaResult<WorkflowSummary>
where
    C: Canvas + ?Sized,
    L: Labeler + ?Sized,
{
    let (width, height) = canvas.dimensions();
    let mut summary = WorkflowSummary::default();

    for (index, face) in record.faces.iter_mut().enumerate() {
        let Some(rect) = resolve(face, height, width) else {
            summary.skip("labeling");
            continue;
        };

        let name = labeler.label(index, &rect)?.trim().to_string();
        debug!(index, x = rect.x, y = rect.y, name = %name, "Labeled face");

        let instructions = labeling_instructions(face, rect, &name);
        face.name = Some(name);
        apply(canvas, &instructions);
        summary.count(&instructions);
    }

    info!(labeled = summary.annotated, skipped = summary.skipped, "Labeling done");
    Ok(summary)
}

/// Render names and boxes from a stored-labels record.
pub fn apply_stored_labels<C: Canvas + ?Sized>(
    canvas: &mut C,
    record: &StoredLabelsRecord,
) -> WorkflowSummary {
    let (width, height) = canvas.dimensions();
    let mut summary = WorkflowSummary::default();

    for face in &record.faces {
        let Some(rect) = resolve_stored(face, height, width) else {
            summary.skip("stored_labels");
            continue;
        };
        let instructions = stored_label_instructions(rect, face.display_name());
        apply(canvas, &instructions);
        summary.count(&instructions);
    }

    info!(rendered = summary.annotated, skipped = summary.skipped, "Stored labels done");
    summary
}

// =============================================================================
// Detector-driven
// =============================================================================

/// Detect faces locally and mark them.
pub fn detect_and_mark<D: FaceDetector + ?Sized>(
    img: &mut RgbImage,
    detector: &mut D,
    options: &MarkOptions,
) -> MediaResult<Vec<PixelRect>> {
    let faces = detect_in_rgb(detector, img)?;
    mark_faces(img, &faces, options);
    Ok(faces)
}

/// Mark already detected faces.
pub fn mark_faces<C: Canvas + ?Sized>(canvas: &mut C, faces: &[PixelRect], options: &MarkOptions) {
    for rect in faces {
        apply(canvas, &mark_instructions(*rect, options));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::detection::FixedFaceDetector;
    use crate::error::MediaError;
    use facemark_models::{AgeRange, BoundingBox, Color, Emotion, FaceEntry, Gender};

    fn record() -> DetectionRecord {
        DetectionRecord {
            faces: vec![
                FaceEntry {
                    bounding_box: Some(BoundingBox::new(0.1, 0.5, 0.2, 0.2)),
                    age_range: Some(AgeRange::new(16, 19)),
                    gender: Some(Gender::new("Male")),
                    emotions: vec![Emotion::new("CALM", 88.0)],
                    ..Default::default()
                },
                FaceEntry {
                    bounding_box: Some(BoundingBox::default()),
                    ..Default::default()
                },
                FaceEntry {
                    bounding_box: Some(BoundingBox::new(0.6, 0.1, 0.2, 0.2)),
                    age_range: Some(AgeRange::new(30, 40)),
                    gender: Some(Gender::new("Female")),
                    ..Default::default()
                },
            ],
            extra: Default::default(),
        }
    }

    #[test]
    fn test_blur_all_skips_missing_box() {
        let mut canvas = RecordingCanvas::new(100, 100);
        let summary = blur_faces(&mut canvas, &record());
        assert_eq!(summary.annotated, 2);
        assert_eq!(summary.skipped, 1);
        assert!(canvas.calls.iter().all(DrawInstruction::is_blur));
    }

    #[test]
    fn test_blur_under_18_uses_lower_bound() {
        let mut canvas = RecordingCanvas::new(100, 100);
        let summary = blur_under_18_faces(&mut canvas, &record());
        assert_eq!(summary.annotated, 1);
        assert_eq!(summary.untouched, 1);
        assert_eq!(
            canvas.calls[0],
            DrawInstruction::Blur {
                rect: PixelRect::new(10, 50, 20, 20),
                kind: crate::instruction::BlurKind::REDACTION,
            }
        );
    }

    #[test]
    fn test_square_faces_colors() {
        let mut canvas = RecordingCanvas::new(100, 100);
        square_faces(&mut canvas, &record());

        let colors: Vec<Color> = canvas
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawInstruction::Rectangle { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        // 16-19 is under 18 by lower bound: yellow; adult female: green
        assert_eq!(colors, vec![Color::YELLOW, Color::GREEN]);
    }

    #[test]
    fn test_apply_labels_sets_names_and_uses_upper_bound() {
        let mut canvas = RecordingCanvas::new(100, 100);
        let mut rec = record();
        let mut labeler = FixedLabels::new(["  Ana ", "Luis"]);

        let summary = apply_labels(&mut canvas, &mut rec, &mut labeler).unwrap();
        assert_eq!(summary.annotated, 2);
        assert_eq!(rec.faces[0].name.as_deref(), Some("Ana"));
        assert_eq!(rec.faces[1].name, None);
        assert_eq!(rec.faces[2].name.as_deref(), Some("Luis"));

        // 16-19 is not a minor by upper bound: no blur, male red
        assert!(!canvas.calls.iter().any(DrawInstruction::is_blur));
        assert!(canvas.calls.contains(&DrawInstruction::Rectangle {
            rect: PixelRect::new(10, 50, 20, 20),
            color: Color::RED,
            thickness: 2,
        }));
    }

    #[test]
    fn test_apply_labels_with_closure_labeler_error() {
        let mut canvas = RecordingCanvas::new(100, 100);
        let mut rec = record();
        let mut failing =
            |_: usize, _: &PixelRect| -> MediaResult<String> { Err(MediaError::labeling_failed("stdin closed")) };
        assert!(apply_labels(&mut canvas, &mut rec, &mut failing).is_err());
    }

    #[test]
    fn test_oversized_box_is_clipped_to_image() {
        let oversized = DetectionRecord {
            faces: vec![FaceEntry {
                bounding_box: Some(BoundingBox::new(0.5, 0.5, 5_000_000.0, 5_000_000.0)),
                age_range: Some(AgeRange::new(12, 15)),
                ..Default::default()
            }],
            extra: Default::default(),
        };

        let mut img = RgbImage::new(100, 100);
        let summary = square_faces(&mut img, &oversized);
        assert_eq!(summary.annotated, 1);
        assert_eq!(*img.get_pixel(50, 50), image::Rgb([255, 255, 0]));
        assert_eq!(*img.get_pixel(99, 99), image::Rgb([0, 0, 0]));

        let mut rec = oversized.clone();
        let mut labeler = FixedLabels::new(["Ana"]);
        apply_labels(&mut img, &mut rec, &mut labeler).unwrap();
        blur_faces(&mut img, &oversized);
    }

    #[test]
    fn test_detect_and_mark_with_fixed_detector() {
        let mut img = RgbImage::new(50, 50);
        let mut detector = FixedFaceDetector::new(vec![PixelRect::new(5, 5, 10, 10)]);
        let faces = detect_and_mark(&mut img, &mut detector, &MarkOptions::default()).unwrap();
        assert_eq!(faces.len(), 1);
        assert_eq!(*img.get_pixel(5, 5), image::Rgb([0, 0, 255]));
    }
}
