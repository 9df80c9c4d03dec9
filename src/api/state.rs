//! Application state shared by handlers

use std::sync::Arc;

use crate::domain::CompliancePipeline;

#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: Arc<CompliancePipeline>,
}

impl AppState {
    pub fn new(pipeline: CompliancePipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
