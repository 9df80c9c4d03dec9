//! Final pipeline result handed back to the caller

use serde::Serialize;

use crate::domain::compliance::CitationMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Accepted,
    Rejected,
}

/// Why the validator rejected an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    AnswerTooShort,
    MissingCitations,
    RefusalAnswer,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnswerTooShort => "answer_too_short",
            Self::MissingCitations => "missing_citations",
            Self::RefusalAnswer => "refusal_answer",
        }
    }
}

/// Answer, provenance and verdict for one query; immutable once built
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub answer: String,
    pub citations: CitationMap,
    pub trace_id: Option<String>,
    pub status: PipelineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<RejectionReason>,
    /// Sub-queries the answer was retrieved for
    pub sub_queries: Vec<String>,
}

impl PipelineResult {
    pub fn is_accepted(&self) -> bool {
        self.status == PipelineStatus::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_result_serialization() {
        let result = PipelineResult {
            answer: "Too short".to_string(),
            citations: CitationMap::new(),
            trace_id: Some("trace-1".to_string()),
            status: PipelineStatus::Rejected,
            rejection_reason: Some(RejectionReason::AnswerTooShort),
            sub_queries: vec!["q".to_string()],
        };

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], "rejected");
        assert_eq!(json["rejection_reason"], "answer_too_short");
        assert_eq!(json["citations"], serde_json::json!({}));
        assert!(!result.is_accepted());
    }

    #[test]
    fn test_accepted_result_omits_reason() {
        let result = PipelineResult {
            answer: "answer".to_string(),
            citations: CitationMap::new(),
            trace_id: None,
            status: PipelineStatus::Accepted,
            rejection_reason: None,
            sub_queries: Vec::new(),
        };

        let json = serde_json::to_value(&result).unwrap();

        assert!(json.get("rejection_reason").is_none());
        assert!(json["trace_id"].is_null());
    }
}
