//! Retrieval - per-sub-query embed + search, merged into one ranked passage set

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::config::PipelineConfig;
use crate::domain::compliance::{Passage, SubQuery};
use crate::domain::embedding::EmbeddingClient;
use crate::domain::vector_index::{SearchRequest, VectorIndexClient};
use crate::domain::DomainError;

/// Output of the retrieve stage
#[derive(Debug, Clone, Default)]
pub struct Retrieval {
    /// Unique by id, ascending distance, at most `max_passages`
    pub passages: Vec<Passage>,
    pub total_sub_queries: usize,
    /// `(origin_index, error)` for every sub-query whose contribution was dropped
    pub failures: Vec<(usize, DomainError)>,
}

impl Retrieval {
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn all_failed(&self) -> bool {
        self.total_sub_queries > 0 && self.failures.len() == self.total_sub_queries
    }

    /// Kind of the first failure in origin order
    pub fn first_error_kind(&self) -> Option<&'static str> {
        self.failures.first().map(|(_, e)| e.kind())
    }
}

#[derive(Debug, Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingClient>,
    index: Arc<dyn VectorIndexClient>,
    config: PipelineConfig,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingClient>,
        index: Arc<dyn VectorIndexClient>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            config,
        }
    }

    /// Retrieve for every sub-query and merge; never fails as a whole
    pub async fn retrieve(&self, sub_queries: &[SubQuery]) -> Retrieval {
        let concurrency = self.config.max_concurrent_retrievals.max(1);

        // Completion order is arbitrary; the buffer is keyed by origin_index.
        let settled: BTreeMap<usize, Result<Vec<Passage>, DomainError>> =
            stream::iter(sub_queries.iter().cloned())
                .map(|sub_query| async move {
                    (sub_query.origin_index(), self.retrieve_one(&sub_query).await)
                })
                .buffer_unordered(concurrency)
                .collect()
                .await;

        let mut failures = Vec::new();
        let mut branches = Vec::with_capacity(settled.len());

        for (origin_index, result) in settled {
            match result {
                Ok(passages) => branches.push(passages),
                Err(e) => {
                    warn!(origin_index, error = %e, "Dropping sub-query contribution");
                    failures.push((origin_index, e));
                }
            }
        }

        let passages = merge_passages(branches, self.config.max_passages);

        info!(
            sub_queries = sub_queries.len(),
            failed = failures.len(),
            passages = passages.len(),
            "Retrieval complete"
        );

        Retrieval {
            passages,
            total_sub_queries: sub_queries.len(),
            failures,
        }
    }

    async fn retrieve_one(&self, sub_query: &SubQuery) -> Result<Vec<Passage>, DomainError> {
        let vector = self
            .embedder
            .embed(sub_query.text())
            .await
            .map_err(|e| match e {
                DomainError::Embedding { .. } => e,
                other => DomainError::embedding(other.to_string()),
            })?;

        let request = SearchRequest::new(vector)
            .with_top_k(self.config.top_k)
            .with_min_score(self.config.min_score);

        let passages = self
            .index
            .search(request)
            .await
            .map_err(|e| match e {
                DomainError::Index { .. } => e,
                other => DomainError::index(other.to_string()),
            })?;

        debug!(
            origin_index = sub_query.origin_index(),
            hits = passages.len(),
            "Sub-query retrieval complete"
        );

        Ok(passages)
    }
}

/// Dedup by passage id (closest match wins), sort best-first, truncate to `cap`
///
/// Branches must be supplied in origin order so that equal-distance collisions
/// resolve the same way on every run.
pub fn merge_passages(branches: Vec<Vec<Passage>>, cap: usize) -> Vec<Passage> {
    let mut by_id: HashMap<String, Passage> = HashMap::new();

    for passage in branches.into_iter().flatten() {
        match by_id.get(&passage.id) {
            Some(existing) if existing.embedding_distance <= passage.embedding_distance => {}
            _ => {
                by_id.insert(passage.id.clone(), passage);
            }
        }
    }

    let mut merged: Vec<Passage> = by_id.into_values().collect();
    merged.sort_by(Passage::relevance_order);
    merged.truncate(cap);
    merged
}
