//! Health and service descriptor endpoints

use axum::{http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;

pub const SERVICE_NAME: &str = "reguscope";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceDescriptor {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// GET /health - liveness only, collaborators are not contacted
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    };

    (StatusCode::OK, Json(response))
}

/// GET /
pub async fn service_info() -> impl IntoResponse {
    Json(ServiceDescriptor {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        description: "Regulatory compliance question answering with cited sources",
        endpoints: vec![
            EndpointInfo {
                method: "POST",
                path: "/compliance-query",
                description: "Answer a compliance question with citations",
            },
            EndpointInfo {
                method: "GET",
                path: "/health",
                description: "Liveness check",
            },
            EndpointInfo {
                method: "GET",
                path: "/metrics",
                description: "Prometheus metrics (when enabled)",
            },
        ],
    })
}
