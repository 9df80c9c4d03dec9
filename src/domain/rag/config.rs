//! Pipeline tuning configuration

use std::time::Duration;

use serde::Deserialize;

/// Retry budget with exponential backoff
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay_ms: u64,
    /// Maximum delay between retries
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay_ms: 200,
            max_delay_ms: 2000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// A budget of exactly one attempt
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    pub fn with_initial_delay(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    pub fn with_max_delay(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate delay before retry number `retry` (0-indexed)
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::from_millis(self.initial_delay_ms.min(self.max_delay_ms));
        }

        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(retry as i32);
        let delay_ms = delay.min(self.max_delay_ms as f64) as u64;

        Duration::from_millis(delay_ms)
    }
}

/// Thresholds, budgets and timeouts for one pipeline instance
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Longest accepted query, in characters
    pub max_query_chars: usize,
    /// Upper bound on decomposed sub-queries
    pub max_sub_queries: usize,
    /// Passages requested per sub-query
    pub top_k: usize,
    /// Minimum similarity a passage must reach in the index
    pub min_score: f32,
    /// Cap on merged passages handed to synthesis
    pub max_passages: usize,
    /// Sub-query retrievals allowed in flight at once
    pub max_concurrent_retrievals: usize,
    /// Character budget for context blocks in the synthesis prompt
    pub max_context_chars: usize,
    /// Length of citation snippets
    pub snippet_chars: usize,
    /// Distance at which relevance reaches zero
    pub distance_normalizer: f32,
    /// Shortest answer the validator accepts
    pub min_answer_chars: usize,
    /// Answers equal to one of these (case-insensitive) are rejected
    pub refusal_patterns: Vec<String>,
    pub decompose_max_tokens: u32,
    pub decompose_temperature: f32,
    pub synthesis_max_tokens: u32,
    pub synthesis_temperature: f32,
    /// End-to-end, per run
    pub deadline_ms: u64,
    pub decompose_retry: RetryConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_query_chars: 2000,
            max_sub_queries: 5,
            top_k: 3,
            min_score: 0.0,
            max_passages: 10,
            max_concurrent_retrievals: 4,
            max_context_chars: 6000,
            snippet_chars: 200,
            distance_normalizer: 1.0,
            min_answer_chars: 50,
            refusal_patterns: default_refusal_patterns(),
            decompose_max_tokens: 300,
            decompose_temperature: 0.3,
            synthesis_max_tokens: 600,
            synthesis_temperature: 0.5,
            deadline_ms: 120_000,
            decompose_retry: RetryConfig::default(),
        }
    }
}

fn default_refusal_patterns() -> Vec<String> {
    [
        "Error generating answer.",
        "I don't know.",
        "I cannot answer that.",
        "I'm sorry, I cannot help with that.",
        "No answer.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl PipelineConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_for_attempt_is_exponential_and_capped() {
        let config = RetryConfig::new(5)
            .with_initial_delay(100)
            .with_max_delay(350)
            .with_backoff_multiplier(2.0);

        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(350));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(350));
    }

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();

        assert_eq!(config.max_query_chars, 2000);
        assert_eq!(config.max_sub_queries, 5);
        assert_eq!(config.max_passages, 10);
        assert_eq!(config.decompose_retry.max_attempts, 2);
        assert_eq!(config.deadline(), Duration::from_secs(120));
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config: PipelineConfig =
            serde_json::from_value(serde_json::json!({ "top_k": 5, "min_answer_chars": 80 }))
                .unwrap();

        assert_eq!(config.top_k, 5);
        assert_eq!(config.min_answer_chars, 80);
        assert_eq!(config.max_passages, 10);
    }
}
