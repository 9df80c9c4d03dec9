//! Citation entries and the ordered citation map attached to answers

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::Passage;

/// Provenance for one `source_<n>` label used in a synthesized answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitationEntry {
    #[serde(skip)]
    pub source_key: String,
    pub document_id: String,
    pub section_number: String,
    pub jurisdiction: String,
    pub effective_date: Option<NaiveDate>,
    /// Always within `[0, 1]`
    pub relevance_score: f32,
    pub snippet: String,
}

impl CitationEntry {
    /// Build the citation for a passage placed in the prompt under `source_key`
    pub fn from_passage(
        source_key: impl Into<String>,
        passage: &Passage,
        distance_normalizer: f32,
        snippet_chars: usize,
    ) -> Self {
        Self {
            source_key: source_key.into(),
            document_id: passage.document_id.clone(),
            section_number: passage.section_number.clone(),
            jurisdiction: passage.jurisdiction.clone(),
            effective_date: passage.effective_date,
            relevance_score: relevance_score(passage.embedding_distance, distance_normalizer),
            snippet: snippet(&passage.text, snippet_chars),
        }
    }
}

/// Map an embedding distance onto a relevance score in `[0, 1]`, rounded to 3 decimals
///
/// Monotonically decreasing in `distance`.
pub fn relevance_score(distance: f32, distance_normalizer: f32) -> f32 {
    let normalizer = if distance_normalizer > 0.0 {
        distance_normalizer
    } else {
        1.0
    };

    if distance.is_nan() {
        return 0.0;
    }

    let score = (1.0 - distance / normalizer).clamp(0.0, 1.0);
    (score * 1000.0).round() / 1000.0
}

/// First `max_chars` characters of `text`, with an ellipsis when truncated
pub fn snippet(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();

    match trimmed.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &trimmed[..byte_index]),
        None => trimmed.to_string(),
    }
}

/// Citation entries keyed by source label, kept in label order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationMap {
    entries: Vec<CitationEntry>,
}

impl CitationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next entry; its label must be `source_<len + 1>`
    pub fn push(&mut self, entry: CitationEntry) {
        debug_assert_eq!(entry.source_key, Self::label_for(self.entries.len()));
        self.entries.push(entry);
    }

    /// Label for the zero-based prompt position `index`
    pub fn label_for(index: usize) -> String {
        format!("source_{}", index + 1)
    }

    pub fn get(&self, source_key: &str) -> Option<&CitationEntry> {
        self.entries.iter().find(|e| e.source_key == source_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.source_key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CitationEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CitationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;

        for entry in &self.entries {
            map.serialize_entry(&entry.source_key, entry)?;
        }

        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_score_is_bounded_and_decreasing() {
        assert_eq!(relevance_score(0.0, 1.0), 1.0);
        assert_eq!(relevance_score(0.25, 1.0), 0.75);
        assert_eq!(relevance_score(1.5, 1.0), 0.0);
        assert_eq!(relevance_score(-0.2, 1.0), 1.0);
        assert_eq!(relevance_score(1.0, 2.0), 0.5);
        assert!(relevance_score(0.1, 1.0) > relevance_score(0.2, 1.0));
        assert_eq!(relevance_score(f32::NAN, 1.0), 0.0);
    }

    #[test]
    fn test_relevance_score_ignores_non_positive_normalizer() {
        assert_eq!(relevance_score(0.4, 0.0), 0.6);
    }

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        assert_eq!(snippet("short", 200), "short");
        assert_eq!(snippet("abcdef", 3), "abc...");
        assert_eq!(snippet("ééééé", 2), "éé...");
    }

    #[test]
    fn test_citation_map_serializes_in_label_order() {
        let mut map = CitationMap::new();

        for index in 0..11 {
            let passage = Passage::new(format!("p-{}", index), "ITAR_127_1", "text", 0.1);
            map.push(CitationEntry::from_passage(
                CitationMap::label_for(index),
                &passage,
                1.0,
                200,
            ));
        }

        let json = serde_json::to_string(&map).unwrap();
        let first = json.find("\"source_1\"").unwrap();
        let second = json.find("\"source_2\"").unwrap();
        let eleventh = json.find("\"source_11\"").unwrap();

        assert!(first < second);
        assert!(second < eleventh);
        assert_eq!(map.len(), 11);
        assert!(map.get("source_11").is_some());
        assert!(!json.contains("source_key"));
    }
}
