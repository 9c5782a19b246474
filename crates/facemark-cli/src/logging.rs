//! Structured logging for one CLI invocation.
//!
//! Every event carries the operation name and its input path, and the
//! closing event reports how long the invocation took.

use std::path::{Path, PathBuf};
use std::time::Instant;

use facemark_media::WorkflowSummary;
use tracing::{error, info, warn, Span};

/// Logger for one operation on one input.
#[derive(Debug, Clone)]
pub struct OperationLogger {
    operation: String,
    input: String,
    started: Instant,
}

impl OperationLogger {
    pub fn new(operation: &str, input: &Path) -> Self {
        Self {
            operation: operation.to_string(),
            input: input.display().to_string(),
            started: Instant::now(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            operation = %self.operation,
            input = %self.input,
            "Operation started: {}", message
        );
    }

    /// Per-face counts from a workflow. Faces without a usable box turn the
    /// event into a warning.
    pub fn log_summary(&self, summary: &WorkflowSummary) {
        let message = summary_message(summary);
        if summary.skipped > 0 {
            warn!(
                operation = %self.operation,
                input = %self.input,
                annotated = summary.annotated,
                untouched = summary.untouched,
                skipped = summary.skipped,
                "Faces processed: {}", message
            );
        } else {
            info!(
                operation = %self.operation,
                input = %self.input,
                annotated = summary.annotated,
                untouched = summary.untouched,
                "Faces processed: {}", message
            );
        }
    }

    pub fn log_detected(&self, faces: usize) {
        info!(
            operation = %self.operation,
            input = %self.input,
            faces,
            "Faces detected"
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            operation = %self.operation,
            input = %self.input,
            "Operation warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            operation = %self.operation,
            input = %self.input,
            elapsed_ms = self.elapsed_ms(),
            "Operation failed: {}", message
        );
    }

    /// Closing event listing every file written.
    pub fn log_written(&self, outputs: &[PathBuf]) {
        let listed: Vec<String> = outputs.iter().map(|p| p.display().to_string()).collect();
        info!(
            operation = %self.operation,
            input = %self.input,
            outputs = ?listed,
            elapsed_ms = self.elapsed_ms(),
            "Operation completed"
        );
    }

    fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    /// Span covering the whole operation.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "operation",
            operation = %self.operation,
            input = %self.input
        )
    }
}

/// `"2 annotated, 1 untouched, 1 skipped"`, leaving out zero counts other
/// than `annotated`.
pub fn summary_message(summary: &WorkflowSummary) -> String {
    let mut parts = vec![format!("{} annotated", summary.annotated)];
    if summary.untouched > 0 {
        parts.push(format!("{} untouched", summary.untouched));
    }
    if summary.skipped > 0 {
        parts.push(format!("{} skipped", summary.skipped));
    }
    parts.join(", ")
}
