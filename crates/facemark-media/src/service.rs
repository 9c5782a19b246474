//! One-shot processing of an image with its record.
//!
//! Loads the inputs, dispatches on [`Operation`], and only writes outputs
//! once the whole image was processed. Outputs are staged next to their
//! destinations and renamed together, so an error leaves no output behind.

use std::path::{Path, PathBuf};
use std::time::Instant;

use facemark_models::{DetectionRecord, Operation, StoredLabelsRecord};
use tracing::{info, warn};

use crate::error::MediaResult;
use crate::fs_utils::{
    commit_all, load_image, read_record, read_stored_labels, stage_image, stage_record,
    stage_stored_labels, DEFAULT_IMAGE_EXTENSION,
};
use crate::metrics;
use crate::workflows::{
    apply_labels, apply_stored_labels, blur_faces, blur_under_18_faces, square_faces, Labeler,
    WorkflowSummary,
};

/// Inputs and outputs of one invocation.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub operation: Operation,
    pub image_path: PathBuf,
    /// JSON detection record, or stored-labels XML for
    /// [`Operation::ApplyStoredLabels`]
    pub record_path: PathBuf,
    pub output_path: PathBuf,
    /// Labeled record destination. `.xml` writes the stored-labels format,
    /// anything else pretty JSON. Defaults to the output image path with a
    /// `.json` extension.
    pub record_output_path: Option<PathBuf>,
    pub default_extension: String,
}

impl ProcessRequest {
    pub fn new(
        operation: Operation,
        image_path: impl Into<PathBuf>,
        record_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            operation,
            image_path: image_path.into(),
            record_path: record_path.into(),
            output_path: output_path.into(),
            record_output_path: None,
            default_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
        }
    }

    pub fn with_record_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.record_output_path = Some(path.into());
        self
    }

    pub fn with_default_extension(mut self, ext: impl Into<String>) -> Self {
        self.default_extension = ext.into();
        self
    }

    fn labeled_record_path(&self) -> PathBuf {
        self.record_output_path
            .clone()
            .unwrap_or_else(|| self.output_path.with_extension("json"))
    }
}

/// What was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub image: PathBuf,
    pub record: Option<PathBuf>,
    pub summary: WorkflowSummary,
}

/// Run one operation end to end.
///
/// `labeler` is only consulted by [`Operation::ApplyLabels`].
pub fn process<L: Labeler + ?Sized>(request: &ProcessRequest, labeler: &mut L) -> MediaResult<ProcessOutcome> {
    let started = Instant::now();
    let result = run(request, labeler);
    let elapsed = started.elapsed().as_secs_f64();

    metrics::record_operation(request.operation.as_str(), result.is_ok(), elapsed);
    match &result {
        Ok(outcome) => info!(
            operation = %request.operation,
            image = %outcome.image.display(),
            annotated = outcome.summary.annotated,
            skipped = outcome.summary.skipped,
            elapsed_secs = elapsed,
            "Operation complete"
        ),
        Err(e) => warn!(operation = %request.operation, error = %e, "Operation failed"),
    }
    result
}

fn run<L: Labeler + ?Sized>(request: &ProcessRequest, labeler: &mut L) -> MediaResult<ProcessOutcome> {
    let mut img = load_image(&request.image_path)?;

    let (summary, labeled) = match request.operation {
        Operation::Blur => (blur_faces(&mut img, &load_record(request)?), None),
        Operation::BlurUnder18 => (blur_under_18_faces(&mut img, &load_record(request)?), None),
        Operation::SquareFace => (square_faces(&mut img, &load_record(request)?), None),
        Operation::ApplyLabels => {
            let mut record = load_record(request)?;
            let summary = apply_labels(&mut img, &mut record, labeler)?;
            (summary, Some(record))
        }
        Operation::ApplyStoredLabels => {
            let stored = read_stored_labels(&request.record_path)?;
            (apply_stored_labels(&mut img, &stored), None)
        }
    };

    let image_file = stage_image(&img, &request.output_path, &request.default_extension)?;
    let image = image_file.target().to_path_buf();
    let mut staged = vec![image_file];
    let record_path = match labeled {
        Some(record) => {
            let path = request.labeled_record_path();
            let file = if is_xml(&path) {
                stage_stored_labels(&StoredLabelsRecord::from_detection_record(&record), &path)?
            } else {
                stage_record(&record, &path)?
            };
            staged.push(file);
            Some(path)
        }
        None => None,
    };

    commit_all(staged)?;
    info!(path = %image.display(), "Image saved");
    if let Some(path) = &record_path {
        info!(path = %path.display(), "Record saved");
    }

    Ok(ProcessOutcome {
        image,
        record: record_path,
        summary,
    })
}

fn load_record(request: &ProcessRequest) -> MediaResult<DetectionRecord> {
    let record = read_record(&request.record_path)?;
    info!(
        operation = %request.operation,
        faces = record.len(),
        record = %request.record_path.display(),
        "Record loaded"
    );
    Ok(record)
}

fn is_xml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xml"))
        .unwrap_or(false)
}
