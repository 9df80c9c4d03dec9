use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::llm::{CompletionRequest, LlmClient};
use crate::domain::rag::retry_with_backoff;
use crate::domain::{DomainError, RetryConfig};
use crate::infrastructure::http_client::HttpClientTrait;

/// OpenAI-compatible chat completions client (vLLM, llama-server `/v1`, OpenAI)
///
/// The prompt is sent as a single user message.
#[derive(Debug)]
pub struct OpenAiCompletionClient<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
    model: String,
    retry: RetryConfig,
}

impl<C: HttpClientTrait> OpenAiCompletionClient<C> {
    pub fn new(client: C, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            auth_header: None,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.auth_header = Some(format!("Bearer {}", api_key.into()));
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(auth) = &self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }

    fn build_request(&self, request: &CompletionRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": request.prompt}],
            "max_tokens": request.max_tokens,
        });

        if let Some(temperature) = request.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        if let Some(stop) = &request.stop {
            body["stop"] = serde_json::json!(stop);
        }

        body
    }

    async fn complete_once(&self, body: &serde_json::Value) -> Result<String, DomainError> {
        let json = self
            .client
            .post_json(&self.chat_completions_url(), self.headers(), body)
            .await
            .map_err(|e| e.into_domain("openai", DomainError::llm))?;

        let response: ChatResponse = serde_json::from_value(json)
            .map_err(|e| DomainError::llm(format!("Failed to parse response: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::llm("No choices in response"))?;

        Ok(choice.message.content.unwrap_or_default().trim().to_string())
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmClient for OpenAiCompletionClient<C> {
    async fn complete(&self, request: CompletionRequest) -> Result<String, DomainError> {
        let body = self.build_request(&request);

        retry_with_backoff(&self.retry, "chat completion", || self.complete_once(&body)).await
    }

    fn client_name(&self) -> &'static str {
        "openai"
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
