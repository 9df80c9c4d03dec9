//! Vector index client trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::compliance::Passage;
use crate::domain::DomainError;

/// Nearest-neighbour query parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Query vector
    pub vector: Vec<f32>,
    /// Number of results to return
    pub top_k: usize,
    /// Minimum similarity score a result must reach
    pub min_score: f32,
}

impl SearchRequest {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            top_k: 3,
            min_score: 0.0,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }
}

/// Read-only query interface of the passage store
///
/// Implementations return passages ordered by ascending `embedding_distance`
/// and fail with `DomainError::Index` on backend failure.
#[async_trait]
pub trait VectorIndexClient: Send + Sync + Debug {
    async fn search(&self, request: SearchRequest) -> Result<Vec<Passage>, DomainError>;

    /// Get the index type name
    fn index_type(&self) -> &'static str;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_builder() {
        let request = SearchRequest::new(vec![0.1, 0.2])
            .with_top_k(5)
            .with_min_score(0.4);

        assert_eq!(request.top_k, 5);
        assert_eq!(request.min_score, 0.4);
        assert_eq!(request.vector, vec![0.1, 0.2]);
    }
}
