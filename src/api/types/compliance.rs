//! Request and response bodies of the compliance endpoint

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{CitationMap, PipelineResult, PipelineStatus, RejectionReason};

/// The upper bound on `user_query` is the pipeline's `max_query_chars`, checked by the handler
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ComplianceQueryRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub user_query: String,
    #[validate(length(min = 1, max = 128, message = "must be between 1 and 128 characters"))]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceQueryResponse {
    pub answer: String,
    pub citations: CitationMap,
    pub trace_id: Option<String>,
    pub status: PipelineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<RejectionReason>,
}

impl From<PipelineResult> for ComplianceQueryResponse {
    fn from(result: PipelineResult) -> Self {
        Self {
            answer: result.answer,
            citations: result.citations,
            trace_id: result.trace_id,
            status: result.status,
            rejection_reason: result.rejection_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validation_bounds() {
        let ok = ComplianceQueryRequest {
            user_query: "What is ITAR?".to_string(),
            user_id: "test_user_001".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = ComplianceQueryRequest {
            user_query: String::new(),
            ..ok.clone()
        };
        assert!(empty.validate().is_err());

        let long = ComplianceQueryRequest {
            user_query: "é".repeat(5000),
            ..ok.clone()
        };
        assert!(long.validate().is_ok());

        let no_user = ComplianceQueryRequest {
            user_id: String::new(),
            ..ok
        };
        assert!(no_user.validate().is_err());
    }

    #[test]
    fn test_response_omits_absent_rejection_reason() {
        let response = ComplianceQueryResponse {
            answer: "Answer [source_1]".to_string(),
            citations: CitationMap::new(),
            trace_id: Some("trace".to_string()),
            status: PipelineStatus::Accepted,
            rejection_reason: None,
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "accepted");
        assert!(json.get("rejection_reason").is_none());
        assert!(json["citations"].as_object().unwrap().is_empty());
    }
}
