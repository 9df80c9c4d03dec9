//! Observability sinks for pipeline traces

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{info, warn};

use super::metrics::{record_pipeline_run, record_stage_outcome};
use crate::domain::{ObservabilitySink, PipelineTrace};

/// Hands traces to a background task over a bounded channel
///
/// `emit` never blocks; when the buffer is full or the consumer is gone the trace is
/// dropped and counted.
#[derive(Debug, Clone)]
pub struct ChannelObservabilitySink {
    sender: mpsc::Sender<PipelineTrace>,
    dropped: Arc<AtomicU64>,
}

/// Receiving half that logs traces and records metrics
#[derive(Debug)]
pub struct TraceConsumer {
    receiver: mpsc::Receiver<PipelineTrace>,
}

impl ChannelObservabilitySink {
    pub fn new(capacity: usize) -> (Self, TraceConsumer) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        let sink = Self {
            sender,
            dropped: Arc::new(AtomicU64::new(0)),
        };

        (sink, TraceConsumer { receiver })
    }

    /// Create the sink and spawn its consumer on the current runtime
    pub fn spawn(capacity: usize) -> Self {
        let (sink, consumer) = Self::new(capacity);
        tokio::spawn(consumer.run());
        sink
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl ObservabilitySink for ChannelObservabilitySink {
    fn emit(&self, trace: PipelineTrace) {
        if let Err(e) = self.sender.try_send(trace) {
            self.dropped.fetch_add(1, Ordering::Relaxed);

            let (reason, trace) = match e {
                TrySendError::Full(trace) => ("buffer_full", trace),
                TrySendError::Closed(trace) => ("consumer_closed", trace),
            };

            warn!(trace_id = %trace.trace_id, reason, "Dropping pipeline trace");
        }
    }
}

impl TraceConsumer {
    /// Drain traces until every sink handle is dropped; returns how many were processed
    pub async fn run(mut self) -> u64 {
        let mut processed = 0;

        while let Some(trace) = self.receiver.recv().await {
            record(&trace);
            processed += 1;
        }

        processed
    }
}

fn record(trace: &PipelineTrace) {
    for outcome in &trace.outcomes {
        info!(
            trace_id = %trace.trace_id,
            stage = outcome.stage.as_str(),
            status = outcome.status_label(),
            error_kind = outcome.error_kind.unwrap_or("none"),
            latency_ms = outcome.latency.as_millis() as u64,
            "Stage outcome"
        );
        record_stage_outcome(outcome);
    }

    info!(
        trace_id = %trace.trace_id,
        user_id = %trace.user_id,
        status = trace.status.as_str(),
        total_latency_ms = trace.total_latency.as_millis() as u64,
        "Pipeline trace"
    );
    record_pipeline_run(trace.status, trace.total_latency);
}

/// Discards every trace
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObservabilitySink;

impl ObservabilitySink for NoopObservabilitySink {
    fn emit(&self, _trace: PipelineTrace) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StageName, StageOutcome, TraceStatus};
    use std::time::Duration;

    fn trace(id: &str) -> PipelineTrace {
        PipelineTrace {
            trace_id: id.to_string(),
            user_id: "user".to_string(),
            outcomes: vec![
                StageOutcome::success(StageName::Decompose, Duration::from_millis(5)),
                StageOutcome::degraded(
                    StageName::Retrieve,
                    "embedding_error",
                    Duration::from_millis(9),
                ),
            ],
            status: TraceStatus::Accepted,
            total_latency: Duration::from_millis(14),
        }
    }

    #[tokio::test]
    async fn test_consumer_processes_emitted_traces() {
        let (sink, consumer) = ChannelObservabilitySink::new(8);

        sink.emit(trace("t-1"));
        sink.emit(trace("t-2"));
        drop(sink);

        assert_eq!(consumer.run().await, 2);
    }

    #[tokio::test]
    async fn test_full_buffer_drops_without_blocking() {
        let (sink, consumer) = ChannelObservabilitySink::new(1);

        sink.emit(trace("t-1"));
        sink.emit(trace("t-2"));
        sink.emit(trace("t-3"));

        assert_eq!(sink.dropped(), 2);
        drop(sink);
        assert_eq!(consumer.run().await, 1);
    }

    #[tokio::test]
    async fn test_closed_consumer_drops() {
        let (sink, consumer) = ChannelObservabilitySink::new(4);
        drop(consumer);

        sink.emit(trace("t-1"));

        assert_eq!(sink.dropped(), 1);
    }

    #[test]
    fn test_noop_sink_accepts_traces() {
        NoopObservabilitySink.emit(trace("t-1"));
    }
}
