//! Embedding client domain trait and vector helpers

mod client;
mod vector;

pub use client::EmbeddingClient;
pub use vector::{cosine_similarity, l2_normalize};

#[cfg(test)]
pub use client::mock::MockEmbeddingClient;
