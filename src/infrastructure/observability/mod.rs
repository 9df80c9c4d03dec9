//! Observability infrastructure - Metrics and pipeline trace sinks

mod config;
mod metrics;
mod sink;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_http_request, record_pipeline_run,
    record_stage_outcome, PrometheusMetrics,
};
pub use sink::{ChannelObservabilitySink, NoopObservabilitySink, TraceConsumer};
