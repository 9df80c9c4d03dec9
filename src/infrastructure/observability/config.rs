//! Observability configuration

use serde::Deserialize;

/// Prometheus metrics and trace sink configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Metrics endpoint path
    #[serde(default = "default_metrics_path")]
    pub path: String,
    /// Pipeline traces buffered before new ones are dropped
    #[serde(default = "default_trace_buffer")]
    pub trace_buffer: usize,
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_trace_buffer() -> usize {
    1024
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
            trace_buffer: default_trace_buffer(),
        }
    }
}
