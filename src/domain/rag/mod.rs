//! Agentic RAG pipeline for regulatory compliance questions
//!
//! A request moves through Decompose → Retrieve → Synthesize → Validate. Decomposition
//! and retrieval degrade instead of failing; synthesis failure aborts the run.

mod config;
mod decomposer;
mod orchestrator;
mod outcome;
mod result;
mod retriever;
mod retry;
mod synthesizer;
mod validator;

pub use config::{PipelineConfig, RetryConfig};
pub use decomposer::{parse_sub_queries, Decomposition, QueryDecomposer};
pub use orchestrator::CompliancePipeline;
pub use outcome::{ObservabilitySink, PipelineTrace, StageName, StageOutcome, TraceStatus};
pub use result::{PipelineResult, PipelineStatus, RejectionReason};
pub use retriever::{merge_passages, Retrieval, Retriever};
pub use retry::retry_with_backoff;
pub use synthesizer::{SynthesisOutput, Synthesizer};
pub use validator::{AnswerValidator, ValidationVerdict};

#[cfg(test)]
pub use outcome::mock::RecordingObservabilitySink;
