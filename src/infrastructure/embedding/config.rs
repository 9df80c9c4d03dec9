use serde::Deserialize;

use crate::domain::RetryConfig;

/// Embedding backend configuration (any OpenAI-compatible `/v1/embeddings` server)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Expected vector length; responses of any other length are rejected
    pub dimensions: usize,
    /// L2-normalise returned vectors (the corpus is indexed with unit vectors)
    pub normalize: bool,
    pub timeout_ms: u64,
    pub retry: RetryConfig,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            api_key: None,
            model: "BAAI/bge-m3".to_string(),
            dimensions: 1024,
            normalize: true,
            timeout_ms: 30_000,
            retry: RetryConfig::default(),
        }
    }
}
