//! Per-stage outcome records and the observability sink they are emitted to

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::PipelineStatus;

/// The four stages of the pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Decompose,
    Retrieve,
    Synthesize,
    Validate,
}

impl StageName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decompose => "decompose",
            Self::Retrieve => "retrieve",
            Self::Synthesize => "synthesize",
            Self::Validate => "validate",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transient record of how one stage went
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageOutcome {
    pub stage: StageName,
    pub succeeded: bool,
    /// Completed via a fallback rather than the primary path
    pub degraded: bool,
    pub error_kind: Option<&'static str>,
    pub latency: Duration,
}

impl StageOutcome {
    pub fn success(stage: StageName, latency: Duration) -> Self {
        Self {
            stage,
            succeeded: true,
            degraded: false,
            error_kind: None,
            latency,
        }
    }

    pub fn degraded(stage: StageName, error_kind: &'static str, latency: Duration) -> Self {
        Self {
            stage,
            succeeded: true,
            degraded: true,
            error_kind: Some(error_kind),
            latency,
        }
    }

    pub fn failure(stage: StageName, error_kind: &'static str, latency: Duration) -> Self {
        Self {
            stage,
            succeeded: false,
            degraded: false,
            error_kind: Some(error_kind),
            latency,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match (self.succeeded, self.degraded) {
            (true, false) => "success",
            (true, true) => "degraded",
            (false, _) => "failure",
        }
    }
}

/// How a run ended, as reported to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStatus {
    Accepted,
    Rejected,
    Failed,
}

impl TraceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

impl From<PipelineStatus> for TraceStatus {
    fn from(status: PipelineStatus) -> Self {
        match status {
            PipelineStatus::Accepted => Self::Accepted,
            PipelineStatus::Rejected => Self::Rejected,
        }
    }
}

/// Everything emitted for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineTrace {
    pub trace_id: String,
    pub user_id: String,
    pub outcomes: Vec<StageOutcome>,
    pub status: TraceStatus,
    pub total_latency: Duration,
}

/// Receiver for pipeline traces
///
/// `emit` must return promptly and must never fail the caller; delivery is best-effort.
pub trait ObservabilitySink: Send + Sync + fmt::Debug {
    fn emit(&self, trace: PipelineTrace);
}

#[cfg(test)]
pub mod mock {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    pub struct RecordingObservabilitySink {
        traces: Mutex<Vec<PipelineTrace>>,
    }

    impl RecordingObservabilitySink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn traces(&self) -> Vec<PipelineTrace> {
            self.traces.lock().unwrap().clone()
        }
    }

    impl ObservabilitySink for RecordingObservabilitySink {
        fn emit(&self, trace: PipelineTrace) {
            self.traces.lock().unwrap().push(trace);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        let latency = Duration::from_millis(3);

        assert_eq!(StageOutcome::success(StageName::Retrieve, latency).status_label(), "success");
        assert_eq!(
            StageOutcome::degraded(StageName::Decompose, "llm_error", latency).status_label(),
            "degraded"
        );
        assert_eq!(
            StageOutcome::failure(StageName::Synthesize, "synthesis_error", latency).status_label(),
            "failure"
        );
    }

    #[test]
    fn test_stage_names_serialize_snake_case() {
        assert_eq!(serde_json::to_value(StageName::Synthesize).unwrap(), "synthesize");
        assert_eq!(StageName::Validate.to_string(), "validate");
    }
}
