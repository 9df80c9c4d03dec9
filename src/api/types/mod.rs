//! API request, response and error types

pub mod compliance;
pub mod error;
pub mod json;

pub use compliance::{ComplianceQueryRequest, ComplianceQueryResponse};
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
