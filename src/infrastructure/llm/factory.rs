use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::{LlamaCppClient, OpenAiCompletionClient};
use crate::domain::llm::LlmClient;
use crate::domain::{DomainError, RetryConfig};
use crate::infrastructure::http_client::HttpClient;

/// Which completion API the LLM server speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LlmProviderKind {
    #[default]
    LlamaCpp,
    #[serde(rename = "openai")]
    OpenAi,
}

/// LLM backend configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    pub base_url: String,
    pub api_key: Option<String>,
    /// Model name sent to OpenAI-compatible servers; llama.cpp serves one model
    pub model: String,
    pub timeout_ms: u64,
    pub retry: RetryConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::default(),
            base_url: "http://localhost:8080".to_string(),
            api_key: None,
            model: "mistral-7b-instruct".to_string(),
            timeout_ms: 60_000,
            retry: RetryConfig::default(),
        }
    }
}

/// Factory for creating LLM clients
#[derive(Debug)]
pub struct LlmClientFactory;

impl LlmClientFactory {
    /// Create an LLM client from configuration
    pub fn create(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, DomainError> {
        if config.base_url.trim().is_empty() {
            return Err(DomainError::configuration("LLM base_url must not be empty"));
        }

        let http_client = HttpClient::with_timeout(Duration::from_millis(config.timeout_ms))?;

        match config.provider {
            LlmProviderKind::LlamaCpp => {
                let client = LlamaCppClient::new(http_client, &config.base_url)
                    .with_retry(config.retry.clone());
                Ok(Arc::new(client))
            }

            LlmProviderKind::OpenAi => {
                let mut client =
                    OpenAiCompletionClient::new(http_client, &config.base_url, &config.model)
                        .with_retry(config.retry.clone());

                if let Some(key) = &config.api_key {
                    client = client.with_api_key(key);
                }

                Ok(Arc::new(client))
            }
        }
    }
}
