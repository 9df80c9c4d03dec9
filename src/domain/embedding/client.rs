//! Embedding client trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Turns text into a fixed-dimension dense vector
#[async_trait]
pub trait EmbeddingClient: Send + Sync + Debug {
    /// Embed a single text, failing with `DomainError::Embedding` after the client's own retries
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Dimension of every vector this client produces
    fn dimensions(&self) -> usize;

    /// Get the client name
    fn client_name(&self) -> &'static str;
}
