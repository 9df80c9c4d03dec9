//! Compliance query endpoint handler

use std::time::Instant;

use axum::extract::State;
use tracing::{info, warn};
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ComplianceQueryRequest, ComplianceQueryResponse, Json};
use crate::domain::Query;
use crate::infrastructure::observability::record_http_request;

const ROUTE: &str = "/compliance-query";

/// POST /compliance-query
pub async fn compliance_query(
    State(state): State<AppState>,
    Json(request): Json<ComplianceQueryRequest>,
) -> Result<Json<ComplianceQueryResponse>, ApiError> {
    let start = Instant::now();

    if let Err(error) = check_request(&request, state.pipeline.config().max_query_chars) {
        warn!(param = ?error.response.error.param, "Rejected invalid compliance query");
        record_http_request("POST", ROUTE, error.status.as_u16(), start.elapsed());
        return Err(error);
    }

    info!(
        user_id = %request.user_id,
        query_chars = request.user_query.chars().count(),
        "Processing compliance query"
    );

    let query = Query::new(request.user_query, request.user_id);

    match state.pipeline.run(query).await {
        Ok(result) => {
            record_http_request("POST", ROUTE, 200, start.elapsed());
            Ok(Json(result.into()))
        }
        Err(e) => {
            let error = ApiError::from(e);
            record_http_request("POST", ROUTE, error.status.as_u16(), start.elapsed());
            Err(error)
        }
    }
}

/// Field bounds, plus the query length cap of the running pipeline
fn check_request(
    request: &ComplianceQueryRequest,
    max_query_chars: usize,
) -> Result<(), ApiError> {
    if let Err(errors) = request.validate() {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|field| field.to_string())
            .unwrap_or_default();

        return Err(
            ApiError::bad_request(format!("Invalid request: {}", errors)).with_param(field),
        );
    }

    if request.user_query.chars().count() > max_query_chars {
        return Err(ApiError::bad_request(format!(
            "Invalid request: user_query must be at most {} characters",
            max_query_chars
        ))
        .with_param("user_query"));
    }

    Ok(())
}
