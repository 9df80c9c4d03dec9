//! In-memory vector index for development and testing

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::compliance::{Passage, UNKNOWN_JURISDICTION, UNKNOWN_SECTION};
use crate::domain::embedding::{cosine_similarity, EmbeddingClient};
use crate::domain::vector_index::{SearchRequest, VectorIndexClient};
use crate::domain::DomainError;

/// One passage in a seed file
#[derive(Debug, Clone, Deserialize)]
pub struct FixturePassage {
    pub id: String,
    pub document_id: String,
    pub text: String,
    #[serde(default)]
    pub section_number: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
}

impl From<FixturePassage> for Passage {
    fn from(fixture: FixturePassage) -> Self {
        let section_number = fixture
            .section_number
            .unwrap_or_else(|| UNKNOWN_SECTION.to_string());
        let jurisdiction = fixture
            .jurisdiction
            .unwrap_or_else(|| UNKNOWN_JURISDICTION.to_string());

        let passage = Passage::new(fixture.id, fixture.document_id, fixture.text, 0.0)
            .with_section_number(section_number)
            .with_jurisdiction(jurisdiction);

        match fixture.effective_date {
            Some(date) => passage.with_effective_date(date),
            None => passage,
        }
    }
}

/// Brute-force cosine search over inserted passages of a fixed dimension
#[derive(Debug, Clone)]
pub struct InMemoryVectorIndex {
    dimensions: usize,
    entries: Arc<RwLock<Vec<(Passage, Vec<f32>)>>>,
}

impl InMemoryVectorIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn check_dimensions(&self, vector: &[f32], what: &str) -> Result<(), DomainError> {
        if vector.len() != self.dimensions {
            return Err(DomainError::index(format!(
                "{} vector has {} dimensions, index holds {}",
                what,
                vector.len(),
                self.dimensions
            )));
        }

        Ok(())
    }

    /// Insert a passage, replacing any existing entry with the same id
    pub async fn insert(&self, passage: Passage, vector: Vec<f32>) -> Result<(), DomainError> {
        self.check_dimensions(&vector, "Passage")?;

        let mut entries = self.entries.write().await;
        entries.retain(|(existing, _)| existing.id != passage.id);
        entries.push((passage, vector));

        Ok(())
    }

    /// Embed and insert every passage of a JSON seed file; returns the count inserted
    pub async fn seed_from_fixture(
        &self,
        path: impl AsRef<Path>,
        embedder: &dyn EmbeddingClient,
    ) -> Result<usize, DomainError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let fixtures: Vec<FixturePassage> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::configuration(format!("Invalid seed file {}: {}", path.display(), e))
        })?;

        let count = fixtures.len();

        for fixture in fixtures {
            let vector = embedder.embed(&fixture.text).await?;
            debug!(id = %fixture.id, "Seeding passage");
            self.insert(fixture.into(), vector).await?;
        }

        Ok(count)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl VectorIndexClient for InMemoryVectorIndex {
    async fn search(&self, request: SearchRequest) -> Result<Vec<Passage>, DomainError> {
        self.check_dimensions(&request.vector, "Query")?;

        let entries = self.entries.read().await;

        let mut results: Vec<Passage> = entries
            .iter()
            .filter_map(|(passage, vector)| {
                let score = cosine_similarity(&request.vector, vector);
                (score >= request.min_score).then(|| passage.clone().with_distance(1.0 - score))
            })
            .collect();

        results.sort_by(Passage::relevance_order);
        results.truncate(request.top_k);

        Ok(results)
    }

    fn index_type(&self) -> &'static str {
        "in_memory"
    }
}
