//! llama.cpp server completion client

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::llm::{CompletionRequest, LlmClient};
use crate::domain::rag::retry_with_backoff;
use crate::domain::{DomainError, RetryConfig};
use crate::infrastructure::http_client::HttpClientTrait;

/// Stop sequences applied when a request names none
pub const DEFAULT_STOP: &[&str] = &["\n\n\n", "###"];

/// Talks to a local `llama-server` through its native `/completion` endpoint
#[derive(Debug)]
pub struct LlamaCppClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
    retry: RetryConfig,
}

impl<C: HttpClientTrait> LlamaCppClient<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn completion_url(&self) -> String {
        format!("{}/completion", self.base_url)
    }

    fn build_request(&self, request: &CompletionRequest) -> serde_json::Value {
        let stop: Vec<String> = match &request.stop {
            Some(stop) => stop.clone(),
            None => DEFAULT_STOP.iter().map(|s| s.to_string()).collect(),
        };

        let mut body = serde_json::json!({
            "prompt": request.prompt,
            "n_predict": request.max_tokens,
            "stop": stop,
        });

        if let Some(temperature) = request.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        body
    }

    async fn complete_once(&self, body: &serde_json::Value) -> Result<String, DomainError> {
        let json = self
            .client
            .post_json(
                &self.completion_url(),
                vec![("Content-Type", "application/json")],
                body,
            )
            .await
            .map_err(|e| e.into_domain("llama.cpp", DomainError::llm))?;

        let response: LlamaCompletionResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::llm(format!("Failed to parse llama.cpp response: {}", e))
        })?;

        Ok(response.content.trim().to_string())
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmClient for LlamaCppClient<C> {
    async fn complete(&self, request: CompletionRequest) -> Result<String, DomainError> {
        let body = self.build_request(&request);

        debug!(n_predict = request.max_tokens, "Sending completion to llama.cpp");

        retry_with_backoff(&self.retry, "llama.cpp completion", || self.complete_once(&body)).await
    }

    fn client_name(&self) -> &'static str {
        "llama_cpp"
    }
}

#[derive(Debug, Deserialize)]
struct LlamaCompletionResponse {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::{HttpClient, HttpError, MockHttpClient};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const URL: &str = "http://llm:8080/completion";

    #[tokio::test]
    async fn test_complete_trims_content() {
        let client = MockHttpClient::new().with_response(
            URL,
            json!({"content": "  1. What is ITAR?\n2. Who enforces it?  \n", "stop": true}),
        );
        let llm = LlamaCppClient::new(client, "http://llm:8080/");

        let text = llm
            .complete(CompletionRequest::new("Sub-questions:", 300))
            .await
            .unwrap();

        assert_eq!(text, "1. What is ITAR?\n2. Who enforces it?");
    }

    #[tokio::test]
    async fn test_request_body_uses_default_stop() {
        let client = MockHttpClient::new().with_response(URL, json!({"content": "ok"}));
        let llm = LlamaCppClient::new(client, "http://llm:8080");

        let request = CompletionRequest::builder()
            .prompt("Answer:")
            .max_tokens(600)
            .temperature(0.5)
            .build();
        llm.complete(request).await.unwrap();

        let body = llm.client.last_body().unwrap();
        assert_eq!(body["prompt"], "Answer:");
        assert_eq!(body["n_predict"], 600);
        assert_eq!(body["stop"], json!(["\n\n\n", "###"]));
        assert!((body["temperature"].as_f64().unwrap() - 0.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_failure_is_llm_error_after_retries() {
        let client = MockHttpClient::new()
            .with_error(URL, HttpError::Transport("connection refused".to_string()));
        let llm = LlamaCppClient::new(client, "http://llm:8080")
            .with_retry(RetryConfig::new(3).with_initial_delay(1));

        let error = llm
            .complete(CompletionRequest::new("prompt", 10))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), "llm_error");
        assert_eq!(llm.client.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_timeout_is_reported_as_timeout() {
        let client =
            MockHttpClient::new().with_error(URL, HttpError::Timeout("deadline".to_string()));
        let llm = LlamaCppClient::new(client, "http://llm:8080").with_retry(RetryConfig::no_retry());

        let error = llm
            .complete(CompletionRequest::new("prompt", 10))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), "timeout");
    }

    #[tokio::test]
    async fn test_each_attempt_gets_its_own_request_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/completion"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"content": "too late"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let http = HttpClient::with_timeout(Duration::from_millis(300)).unwrap();
        let llm = LlamaCppClient::new(http, server.uri())
            .with_retry(RetryConfig::new(2).with_initial_delay(1).with_max_delay(2));

        let error = llm
            .complete(CompletionRequest::new("Answer:", 10))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), "timeout");
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }
}
