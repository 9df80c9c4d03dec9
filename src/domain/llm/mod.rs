//! LLM client domain models and traits

mod client;
mod request;

pub use client::LlmClient;
pub use request::{CompletionRequest, CompletionRequestBuilder};

#[cfg(test)]
pub use client::mock::MockLlmClient;
