//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error response body: `{"error": {"message": .., "type": ..}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    /// Stable error kind, the same strings as `DomainError::kind`
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type: error_type.into(),
                    param: None,
                    code: None,
                },
            },
        }
    }

    /// Add parameter info
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    /// Add error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_input", message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            DomainError::Synthesis { .. } => StatusCode::BAD_GATEWAY,
            DomainError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self::new(status, err.kind(), err.message())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("user_query must not be empty").with_param("user_query");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.error_type, "invalid_input");
        assert_eq!(err.response.error.param, Some("user_query".to_string()));
    }

    #[test]
    fn test_domain_error_status_mapping() {
        let cases = [
            (DomainError::invalid_input("x"), StatusCode::BAD_REQUEST, "invalid_input"),
            (DomainError::synthesis("x"), StatusCode::BAD_GATEWAY, "synthesis_error"),
            (DomainError::timeout("x"), StatusCode::GATEWAY_TIMEOUT, "timeout"),
            (DomainError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            (DomainError::llm("x"), StatusCode::INTERNAL_SERVER_ERROR, "llm_error"),
        ];

        for (domain_err, status, kind) in cases {
            let api_err: ApiError = domain_err.into();
            assert_eq!(api_err.status, status);
            assert_eq!(api_err.response.error.error_type, kind);
        }
    }

    #[test]
    fn test_error_serialization() {
        let err: ApiError = DomainError::synthesis("LLM unavailable").into();
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["type"], "synthesis_error");
        assert_eq!(json["error"]["message"], "LLM unavailable");
        assert!(json["error"].get("param").is_none());
    }
}
