//! Retrieved regulatory passages

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_JURISDICTION: &str = "Unknown";
pub const UNKNOWN_SECTION: &str = "N/A";

/// A retrievable unit of regulatory text with provenance metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub id: String,
    pub document_id: String,
    pub section_number: String,
    pub jurisdiction: String,
    pub effective_date: Option<NaiveDate>,
    pub text: String,
    /// Distance from the query vector; lower is a closer match
    pub embedding_distance: f32,
}

impl Passage {
    pub fn new(
        id: impl Into<String>,
        document_id: impl Into<String>,
        text: impl Into<String>,
        embedding_distance: f32,
    ) -> Self {
        Self {
            id: id.into(),
            document_id: document_id.into(),
            section_number: UNKNOWN_SECTION.to_string(),
            jurisdiction: UNKNOWN_JURISDICTION.to_string(),
            effective_date: None,
            text: text.into(),
            embedding_distance,
        }
    }

    pub fn with_section_number(mut self, section_number: impl Into<String>) -> Self {
        self.section_number = section_number.into();
        self
    }

    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = jurisdiction.into();
        self
    }

    pub fn with_effective_date(mut self, effective_date: NaiveDate) -> Self {
        self.effective_date = Some(effective_date);
        self
    }

    pub fn with_distance(mut self, embedding_distance: f32) -> Self {
        self.embedding_distance = embedding_distance;
        self
    }

    /// Best match first: ascending distance, ties broken by ascending id
    pub fn relevance_order(a: &Passage, b: &Passage) -> Ordering {
        a.embedding_distance
            .total_cmp(&b.embedding_distance)
            .then_with(|| a.id.cmp(&b.id))
    }
}
