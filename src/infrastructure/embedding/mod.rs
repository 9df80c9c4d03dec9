//! Embedding client implementations

mod config;
mod openai;

pub use config::EmbeddingConfig;
pub use openai::OpenAiEmbeddingClient;
