//! Domain layer - Core business logic and entities

pub mod compliance;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod rag;
pub mod vector_index;

pub use compliance::{CitationEntry, CitationMap, Passage, Query, SubQuery};
pub use embedding::EmbeddingClient;
pub use error::DomainError;
pub use llm::{CompletionRequest, LlmClient};
pub use rag::{
    CompliancePipeline, ObservabilitySink, PipelineConfig, PipelineResult, PipelineStatus,
    PipelineTrace, RejectionReason, RetryConfig, StageName, StageOutcome, TraceStatus,
};
pub use vector_index::{SearchRequest, VectorIndexClient};
