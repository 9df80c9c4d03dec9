//! JSON body extractor whose rejections use the API error body

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};

use super::error::ApiError;

pub const JSON_PARSE_ERROR: &str = "json_parse_error";

/// `axum::Json` with `{"error": ..}` rejections instead of plain-text ones
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        axum::Json::<T>::from_request(req, state)
            .await
            .map(|axum::Json(value)| Json(value))
            .map_err(|rejection| rejection_error(&rejection))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Missing content type is 415; every other body problem is a 400
fn rejection_error(rejection: &JsonRejection) -> ApiError {
    let (status, message) = match rejection {
        JsonRejection::MissingJsonContentType(_) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected a request with Content-Type: application/json".to_string(),
        ),
        JsonRejection::JsonSyntaxError(err) => (
            StatusCode::BAD_REQUEST,
            format!("Malformed JSON body: {}", err.body_text()),
        ),
        JsonRejection::JsonDataError(err) => (
            StatusCode::BAD_REQUEST,
            format!("Request body does not match the expected shape: {}", err.body_text()),
        ),
        other => (
            StatusCode::BAD_REQUEST,
            format!("Unreadable request body: {}", other.body_text()),
        ),
    };

    ApiError::new(status, "invalid_input", message).with_code(JSON_PARSE_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct QueryBody {
        user_query: String,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder()
            .method("POST")
            .uri("/compliance-query");

        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }

        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let Json(body) = Json::<QueryBody>::from_request(
            request(Some("application/json"), r#"{"user_query": "What is ITAR?"}"#),
            &(),
        )
        .await
        .unwrap();

        assert_eq!(body.user_query, "What is ITAR?");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_415() {
        let error = Json::<QueryBody>::from_request(request(None, "{}"), &())
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(error.response.error.code.as_deref(), Some(JSON_PARSE_ERROR));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_400_not_422() {
        let error = Json::<QueryBody>::from_request(
            request(Some("application/json"), r#"{"user_query": 42}"#),
            &(),
        )
        .await
        .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.response.error.error_type, "invalid_input");
    }
}
