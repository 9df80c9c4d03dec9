//! Qdrant REST search client

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use super::VectorIndexConfig;
use crate::domain::compliance::{Passage, UNKNOWN_JURISDICTION, UNKNOWN_SECTION};
use crate::domain::rag::retry_with_backoff;
use crate::domain::vector_index::{SearchRequest, VectorIndexClient};
use crate::domain::{DomainError, RetryConfig};
use crate::infrastructure::http_client::HttpClientTrait;

/// Searches a Qdrant collection populated with cosine-similarity passage vectors
#[derive(Debug)]
pub struct QdrantIndexClient<C: HttpClientTrait> {
    client: C,
    url: String,
    api_key: Option<String>,
    collection: String,
    retry: RetryConfig,
}

impl<C: HttpClientTrait> QdrantIndexClient<C> {
    pub fn new(client: C, config: &VectorIndexConfig) -> Self {
        Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            collection: config.collection.clone(),
            retry: config.retry.clone(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/collections/{}/points/search", self.url, self.collection)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(key) = &self.api_key {
            headers.push(("api-key", key.as_str()));
        }

        headers
    }

    async fn search_once(&self, body: &serde_json::Value) -> Result<Vec<Passage>, DomainError> {
        let json = self
            .client
            .post_json(&self.search_url(), self.headers(), body)
            .await
            .map_err(|e| e.into_domain("qdrant", DomainError::index))?;

        let response: SearchResponse = serde_json::from_value(json)
            .map_err(|e| DomainError::index(format!("Failed to parse Qdrant response: {}", e)))?;

        let mut passages: Vec<Passage> = response.result.into_iter().map(to_passage).collect();
        passages.sort_by(Passage::relevance_order);

        Ok(passages)
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorIndexClient for QdrantIndexClient<C> {
    async fn search(&self, request: SearchRequest) -> Result<Vec<Passage>, DomainError> {
        let body = serde_json::json!({
            "vector": request.vector,
            "limit": request.top_k,
            "score_threshold": request.min_score,
            "with_payload": true,
        });

        let passages = retry_with_backoff(&self.retry, "qdrant search", || self.search_once(&body))
            .await?;

        debug!(
            collection = %self.collection,
            results = passages.len(),
            "Qdrant search completed"
        );

        Ok(passages)
    }

    fn index_type(&self) -> &'static str {
        "qdrant"
    }
}

fn to_passage(point: ScoredPoint) -> Passage {
    let id = match point.id {
        PointId::Num(n) => n.to_string(),
        PointId::Uuid(s) => s,
    };
    let payload = point.payload.unwrap_or_default();

    let text = payload
        .text
        .or(payload.text_preview)
        .unwrap_or_default();
    let document_id = payload
        .document_id_upper
        .or(payload.document_id)
        .unwrap_or_else(|| id.clone());

    let section_number =
        non_blank(payload.section_number).unwrap_or_else(|| UNKNOWN_SECTION.to_string());
    let jurisdiction =
        non_blank(payload.jurisdiction).unwrap_or_else(|| UNKNOWN_JURISDICTION.to_string());

    let mut passage = Passage::new(id, document_id, text, 1.0 - point.score)
        .with_section_number(section_number)
        .with_jurisdiction(jurisdiction);

    if let Some(raw) = payload.effective_date {
        match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(date) => passage = passage.with_effective_date(date),
            Err(_) => warn!(
                passage_id = %passage.id,
                effective_date = %raw,
                "Ignoring unparseable effective date"
            ),
        }
    }

    passage
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    id: PointId,
    score: f32,
    #[serde(default)]
    payload: Option<PassagePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PointId {
    Num(u64),
    Uuid(String),
}

#[derive(Debug, Default, Deserialize)]
struct PassagePayload {
    text: Option<String>,
    text_preview: Option<String>,
    #[serde(rename = "document_ID")]
    document_id_upper: Option<String>,
    document_id: Option<String>,
    section_number: Option<String>,
    jurisdiction: Option<String>,
    effective_date: Option<String>,
}
