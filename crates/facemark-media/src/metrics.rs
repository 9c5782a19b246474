//! Processing metrics.
//!
//! Counters and histograms go through the `metrics` facade; nothing is
//! recorded unless the embedding program installs a recorder.

use metrics::{counter, histogram};

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Drawing instructions applied, by action (blur, rectangle, text).
    pub const FACES_TOTAL: &str = "facemark_faces_total";

    /// Faces skipped for lack of a usable bounding box.
    pub const FACES_SKIPPED_TOTAL: &str = "facemark_faces_skipped_total";

    /// Operations finished, by operation and status.
    pub const OPERATIONS_TOTAL: &str = "facemark_operations_total";

    /// Wall time spent processing one image.
    pub const PROCESSING_SECONDS: &str = "facemark_processing_seconds";
}

// =============================================================================
// Recording Functions
// =============================================================================

pub fn record_action(action: &'static str) {
    counter!(names::FACES_TOTAL, "action" => action).increment(1);
}

pub fn record_skipped(workflow: &'static str) {
    counter!(names::FACES_SKIPPED_TOTAL, "workflow" => workflow).increment(1);
}

/// Record a finished operation and how long it took.
pub fn record_operation(operation: &str, success: bool, elapsed_secs: f64) {
    let status = if success { "ok" } else { "error" };
    counter!(
        names::OPERATIONS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status
    )
    .increment(1);

    histogram!(
        names::PROCESSING_SECONDS,
        "operation" => operation.to_string()
    )
    .record(elapsed_secs);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_action("blur");
        record_skipped("outline");
        record_operation("blur", true, 0.25);
    }
}
