//! LLM client implementations

mod factory;
mod llama_cpp;
mod openai;

pub use factory::{LlmClientFactory, LlmConfig, LlmProviderKind};
pub use llama_cpp::LlamaCppClient;
pub use openai::OpenAiCompletionClient;
