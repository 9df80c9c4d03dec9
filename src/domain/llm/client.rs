use async_trait::async_trait;
use std::fmt::Debug;

use super::CompletionRequest;
use crate::domain::DomainError;

/// Stateless text-completion client (prompt in, completion out)
#[async_trait]
pub trait LlmClient: Send + Sync + Debug {
    /// Complete a prompt, failing with `DomainError::Llm` or `DomainError::Timeout`
    /// once the client's own retry budget is spent
    async fn complete(&self, request: CompletionRequest) -> Result<String, DomainError>;

    /// Get the client name
    fn client_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    #[derive(Debug, Clone)]
    enum Reply {
        Text(String),
        Error(String),
        Timeout,
    }

    /// Scripted LLM client that picks its reply by prompt substring
    #[derive(Debug, Default)]
    pub struct MockLlmClient {
        rules: Vec<(String, Reply)>,
        default_reply: Option<Reply>,
        failures_before_success: AtomicUsize,
        delay: Option<Duration>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockLlmClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(mut self, text: impl Into<String>) -> Self {
            self.default_reply = Some(Reply::Text(text.into()));
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.default_reply = Some(Reply::Error(error.into()));
            self
        }

        /// Fail every unmatched call the way a client with a spent timeout budget does
        pub fn with_timeout_error(mut self) -> Self {
            self.default_reply = Some(Reply::Timeout);
            self
        }

        /// Reply with `text` when the prompt contains `needle`
        pub fn with_response_when(
            mut self,
            needle: impl Into<String>,
            text: impl Into<String>,
        ) -> Self {
            self.rules.push((needle.into(), Reply::Text(text.into())));
            self
        }

        /// Fail when the prompt contains `needle`
        pub fn with_error_when(mut self, needle: impl Into<String>, error: impl Into<String>) -> Self {
            self.rules.push((needle.into(), Reply::Error(error.into())));
            self
        }

        /// Fail the first `count` calls before replying normally
        pub fn with_failures_before_success(self, count: usize) -> Self {
            self.failures_before_success.store(count, Ordering::SeqCst);
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<String, DomainError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let pending = self.failures_before_success.load(Ordering::SeqCst);

            if pending > 0 {
                self.failures_before_success.store(pending - 1, Ordering::SeqCst);
                return Err(DomainError::llm("mock transient failure"));
            }

            let reply = self
                .rules
                .iter()
                .find(|(needle, _)| request.prompt.contains(needle.as_str()))
                .map(|(_, reply)| reply.clone())
                .or_else(|| self.default_reply.clone())
                .ok_or_else(|| DomainError::llm("No mock response configured"))?;

            match reply {
                Reply::Text(text) => Ok(text),
                Reply::Error(error) => Err(DomainError::llm(error)),
                Reply::Timeout => Err(DomainError::timeout("mock completion timed out")),
            }
        }

        fn client_name(&self) -> &'static str {
            "mock"
        }
    }
}
