//! reguscope
//!
//! Answers regulatory compliance questions with an agentic RAG pipeline:
//! - decomposes a question into focused sub-queries
//! - retrieves passages for each sub-query from a vector index
//! - synthesizes an answer grounded in numbered sources
//! - validates the answer before returning it with citations

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use domain::embedding::EmbeddingClient;
use domain::vector_index::VectorIndexClient;
use domain::{CompliancePipeline, ObservabilitySink};
use infrastructure::embedding::OpenAiEmbeddingClient;
use infrastructure::http_client::HttpClient;
use infrastructure::llm::LlmClientFactory;
use infrastructure::vector_index::{InMemoryVectorIndex, QdrantIndexClient, VectorIndexKind};

/// Wire the configured collaborators into a pipeline
///
/// The `in_memory` index is seeded from `vector_index.fixture_path`, embedding each
/// passage with the configured embedder.
pub async fn build_pipeline(
    config: &AppConfig,
    sink: Arc<dyn ObservabilitySink>,
) -> anyhow::Result<CompliancePipeline> {
    let embedder: Arc<dyn EmbeddingClient> = Arc::new(OpenAiEmbeddingClient::new(
        HttpClient::with_timeout(Duration::from_millis(config.embedding.timeout_ms))
            .context("Failed to create embedding HTTP client")?,
        &config.embedding,
    ));

    let index: Arc<dyn VectorIndexClient> = match config.vector_index.kind {
        VectorIndexKind::Qdrant => Arc::new(QdrantIndexClient::new(
            HttpClient::with_timeout(Duration::from_millis(config.vector_index.timeout_ms))
                .context("Failed to create vector index HTTP client")?,
            &config.vector_index,
        )),
        VectorIndexKind::InMemory => {
            let path = config
                .vector_index
                .fixture_path
                .as_deref()
                .context("vector_index.fixture_path is required for the in_memory index")?;

            let index = InMemoryVectorIndex::new(embedder.dimensions());
            let seeded = index
                .seed_from_fixture(path, embedder.as_ref())
                .await
                .with_context(|| format!("Failed to seed in-memory index from {}", path))?;

            info!(passages = seeded, path, "Seeded in-memory vector index");
            Arc::new(index)
        }
    };

    let llm = LlmClientFactory::create(&config.llm).context("Failed to create LLM client")?;

    info!(
        embedder = embedder.client_name(),
        dimensions = embedder.dimensions(),
        index = index.index_type(),
        llm = llm.client_name(),
        top_k = config.pipeline.top_k,
        "Compliance pipeline configured"
    );

    Ok(CompliancePipeline::new(
        embedder,
        index,
        llm,
        sink,
        config.pipeline.clone(),
    ))
}
