use serde::Deserialize;

use crate::domain::RetryConfig;

/// Which vector index backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VectorIndexKind {
    #[default]
    Qdrant,
    InMemory,
}

/// Vector index configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorIndexConfig {
    pub kind: VectorIndexKind,
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
    /// JSON seed file loaded into the `in_memory` index at startup
    pub fixture_path: Option<String>,
    pub timeout_ms: u64,
    pub retry: RetryConfig,
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            kind: VectorIndexKind::default(),
            url: "http://localhost:6333".to_string(),
            api_key: None,
            collection: "regulatory_passages".to_string(),
            fixture_path: None,
            timeout_ms: 10_000,
            retry: RetryConfig::default(),
        }
    }
}
