//! OpenAI-compatible embedding client

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::EmbeddingConfig;
use crate::domain::embedding::{l2_normalize, EmbeddingClient};
use crate::domain::rag::retry_with_backoff;
use crate::domain::{DomainError, RetryConfig};
use crate::infrastructure::http_client::HttpClientTrait;

/// Embeds sub-queries through a `/v1/embeddings` endpoint
#[derive(Debug)]
pub struct OpenAiEmbeddingClient<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
    model: String,
    dimensions: usize,
    normalize: bool,
    retry: RetryConfig,
}

impl<C: HttpClientTrait> OpenAiEmbeddingClient<C> {
    pub fn new(client: C, config: &EmbeddingConfig) -> Self {
        Self {
            client,
            auth_header: config.api_key.as_ref().map(|key| format!("Bearer {}", key)),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            normalize: config.normalize,
            retry: config.retry.clone(),
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }

    async fn embed_once(&self, body: &serde_json::Value) -> Result<Vec<f32>, DomainError> {
        let json = self
            .client
            .post_json(&self.embeddings_url(), self.headers(), body)
            .await
            .map_err(|e| e.into_domain("embedding", DomainError::embedding))?;

        self.parse_response(json)
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Vec<f32>, DomainError> {
        let response: EmbeddingsResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        let mut vector = response
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::embedding("Embedding response contained no vectors"))?;

        if vector.len() != self.dimensions {
            return Err(DomainError::embedding(format!(
                "Expected {} dimensions, got {}",
                self.dimensions,
                vector.len()
            )));
        }

        if self.normalize {
            l2_normalize(&mut vector);
        }

        Ok(vector)
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingClient for OpenAiEmbeddingClient<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
        });

        debug!(model = %self.model, chars = text.chars().count(), "Embedding text");

        retry_with_backoff(&self.retry, "embed", || self.embed_once(&body)).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn client_name(&self) -> &'static str {
        "openai_compatible"
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::{HttpError, MockHttpClient};

    const TEST_URL: &str = "http://embedder:8081/v1/embeddings";

    fn config(dimensions: usize) -> EmbeddingConfig {
        EmbeddingConfig {
            base_url: "http://embedder:8081/".to_string(),
            dimensions,
            retry: RetryConfig::new(2).with_initial_delay(1),
            ..EmbeddingConfig::default()
        }
    }

    fn response(vector: Vec<f32>) -> serde_json::Value {
        serde_json::json!({
            "object": "list",
            "model": "BAAI/bge-m3",
            "data": [{"object": "embedding", "index": 0, "embedding": vector}],
        })
    }

    #[tokio::test]
    async fn test_embed_normalizes_vector() {
        let client = MockHttpClient::new().with_response(TEST_URL, response(vec![3.0, 4.0]));
        let embedder = OpenAiEmbeddingClient::new(client, &config(2));

        let vector = embedder.embed("export controls").await.unwrap();

        assert!((vector[0] - 0.6).abs() < 1e-6);
        assert!((vector[1] - 0.8).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_embed_sends_model_and_input() {
        let client = MockHttpClient::new().with_response(TEST_URL, response(vec![1.0, 0.0]));
        let embedder = OpenAiEmbeddingClient::new(client, &config(2));

        embedder.embed("What is ITAR?").await.unwrap();

        let body = embedder.client.last_body().unwrap();
        assert_eq!(body["model"], "BAAI/bge-m3");
        assert_eq!(body["input"], "What is ITAR?");
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_embedding_error() {
        let client = MockHttpClient::new().with_response(TEST_URL, response(vec![1.0, 0.0, 0.0]));
        let embedder = OpenAiEmbeddingClient::new(client, &config(2));

        let error = embedder.embed("text").await.unwrap_err();

        assert_eq!(error.kind(), "embedding_error");
        assert!(error.message().contains("Expected 2 dimensions, got 3"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_retried_then_reported() {
        let client = MockHttpClient::new().with_error(
            TEST_URL,
            HttpError::Status {
                status: 503,
                body: "loading model".to_string(),
            },
        );
        let embedder = OpenAiEmbeddingClient::new(client, &config(2));

        let error = embedder.embed("text").await.unwrap_err();

        assert_eq!(error.kind(), "embedding_error");
        assert_eq!(embedder.client.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_data_is_error() {
        let client = MockHttpClient::new().with_response(TEST_URL, serde_json::json!({"data": []}));
        let embedder = OpenAiEmbeddingClient::new(client, &config(2));

        let error = embedder.embed("text").await.unwrap_err();

        assert_eq!(error.kind(), "embedding_error");
    }
}
