//! Pipeline orchestrator - Decompose → Retrieve → Synthesize → Validate

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::config::PipelineConfig;
use super::decomposer::QueryDecomposer;
use super::outcome::{ObservabilitySink, PipelineTrace, StageName, StageOutcome, TraceStatus};
use super::result::{PipelineResult, PipelineStatus};
use super::retriever::Retriever;
use super::synthesizer::{SynthesisOutput, Synthesizer};
use super::validator::AnswerValidator;
use crate::domain::compliance::{Passage, Query, SubQuery};
use crate::domain::embedding::EmbeddingClient;
use crate::domain::llm::LlmClient;
use crate::domain::vector_index::VectorIndexClient;
use crate::domain::DomainError;

/// Per-request state; each variant owns exactly what the next stage needs
#[derive(Debug)]
enum PipelineState {
    Decomposing,
    Retrieving {
        sub_queries: Vec<SubQuery>,
    },
    Synthesizing {
        sub_queries: Vec<SubQuery>,
        passages: Vec<Passage>,
    },
    Validating {
        sub_queries: Vec<SubQuery>,
        synthesis: SynthesisOutput,
    },
    Done(PipelineResult),
}

impl PipelineState {
    fn name(&self) -> &'static str {
        match self {
            Self::Decomposing => "decomposing",
            Self::Retrieving { .. } => "retrieving",
            Self::Synthesizing { .. } => "synthesizing",
            Self::Validating { .. } => "validating",
            Self::Done(_) => "done",
        }
    }
}

/// Agentic RAG pipeline answering compliance queries with cited passages
#[derive(Debug, Clone)]
pub struct CompliancePipeline {
    decomposer: QueryDecomposer,
    retriever: Retriever,
    synthesizer: Synthesizer,
    validator: AnswerValidator,
    sink: Arc<dyn ObservabilitySink>,
    config: PipelineConfig,
}

impl CompliancePipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingClient>,
        index: Arc<dyn VectorIndexClient>,
        llm: Arc<dyn LlmClient>,
        sink: Arc<dyn ObservabilitySink>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            decomposer: QueryDecomposer::new(llm.clone(), config.clone()),
            retriever: Retriever::new(embedder, index, config.clone()),
            synthesizer: Synthesizer::new(llm, config.clone()),
            validator: AnswerValidator::new(&config),
            sink,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline under the configured end-to-end deadline
    pub async fn run(&self, query: Query) -> Result<PipelineResult, DomainError> {
        self.run_with_deadline(query, self.config.deadline()).await
    }

    /// Run the pipeline, aborting with `DomainError::Timeout` if `deadline`
    /// passes before the run is done
    ///
    /// The deadline is checked between stages; a stage already in flight is
    /// bounded only by its per-call timeouts.
    pub async fn run_with_deadline(
        &self,
        query: Query,
        deadline: Duration,
    ) -> Result<PipelineResult, DomainError> {
        query.validate(self.config.max_query_chars)?;

        let trace_id = Uuid::new_v4().to_string();
        let span = info_span!(
            "compliance_pipeline",
            trace_id = %trace_id,
            user_id = %query.user_id()
        );

        self.execute(query, trace_id, deadline).instrument(span).await
    }

    async fn execute(
        &self,
        query: Query,
        trace_id: String,
        deadline: Duration,
    ) -> Result<PipelineResult, DomainError> {
        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(4);
        let mut state = PipelineState::Decomposing;

        info!("Pipeline started");

        loop {
            let from = state.name();

            state = match self.advance(state, &query, &trace_id, &mut outcomes).await {
                Ok(next) => next,
                Err(e) => {
                    error!(stage = from, error = %e, "Pipeline aborted");
                    self.emit(&query, &trace_id, outcomes, TraceStatus::Failed, started);
                    return Err(e);
                }
            };

            if started.elapsed() >= deadline {
                error!(
                    stage = from,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Pipeline deadline exceeded"
                );
                self.emit(&query, &trace_id, outcomes, TraceStatus::Failed, started);
                return Err(DomainError::timeout(format!(
                    "Pipeline exceeded its {}ms deadline",
                    deadline.as_millis()
                )));
            }

            if let PipelineState::Done(result) = state {
                info!(
                    status = ?result.status,
                    citations = result.citations.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Pipeline done"
                );
                self.emit(&query, &trace_id, outcomes, result.status.into(), started);
                return Ok(result);
            }

            info!(from, to = state.name(), "Stage transition");
        }
    }

    async fn advance(
        &self,
        state: PipelineState,
        query: &Query,
        trace_id: &str,
        outcomes: &mut Vec<StageOutcome>,
    ) -> Result<PipelineState, DomainError> {
        match state {
            PipelineState::Decomposing => {
                let stage_start = Instant::now();
                let decomposition = self.decomposer.decompose(query).await?;
                let latency = stage_start.elapsed();

                outcomes.push(match decomposition.fallback_reason {
                    Some(reason) => StageOutcome::degraded(StageName::Decompose, reason, latency),
                    None => StageOutcome::success(StageName::Decompose, latency),
                });

                Ok(PipelineState::Retrieving {
                    sub_queries: decomposition.sub_queries,
                })
            }

            PipelineState::Retrieving { sub_queries } => {
                let stage_start = Instant::now();
                let retrieval = self.retriever.retrieve(&sub_queries).await;
                let latency = stage_start.elapsed();

                outcomes.push(match retrieval.first_error_kind() {
                    Some(kind) => StageOutcome::degraded(StageName::Retrieve, kind, latency),
                    None => StageOutcome::success(StageName::Retrieve, latency),
                });

                if retrieval.all_failed() {
                    info!("All sub-query retrievals failed, continuing without context");
                }

                Ok(PipelineState::Synthesizing {
                    sub_queries,
                    passages: retrieval.passages,
                })
            }

            PipelineState::Synthesizing {
                sub_queries,
                passages,
            } => {
                let stage_start = Instant::now();
                let result = self.synthesizer.synthesize(query, &passages).await;
                let latency = stage_start.elapsed();

                match result {
                    Ok(synthesis) => {
                        outcomes.push(StageOutcome::success(StageName::Synthesize, latency));
                        Ok(PipelineState::Validating {
                            sub_queries,
                            synthesis,
                        })
                    }
                    Err(e) => {
                        outcomes.push(StageOutcome::failure(
                            StageName::Synthesize,
                            e.kind(),
                            latency,
                        ));
                        Err(e)
                    }
                }
            }

            PipelineState::Validating {
                sub_queries,
                synthesis,
            } => {
                let stage_start = Instant::now();
                let verdict = self.validator.validate(&synthesis);
                outcomes.push(StageOutcome::success(StageName::Validate, stage_start.elapsed()));

                let status = if verdict.accepted {
                    PipelineStatus::Accepted
                } else {
                    PipelineStatus::Rejected
                };

                Ok(PipelineState::Done(PipelineResult {
                    answer: synthesis.answer,
                    citations: synthesis.citations,
                    trace_id: Some(trace_id.to_string()),
                    status,
                    rejection_reason: verdict.reason,
                    sub_queries: sub_queries.into_iter().map(|s| s.text().to_string()).collect(),
                }))
            }

            PipelineState::Done(result) => Ok(PipelineState::Done(result)),
        }
    }

    fn emit(
        &self,
        query: &Query,
        trace_id: &str,
        outcomes: Vec<StageOutcome>,
        status: TraceStatus,
        started: Instant,
    ) {
        self.sink.emit(PipelineTrace {
            trace_id: trace_id.to_string(),
            user_id: query.user_id().to_string(),
            outcomes,
            status,
            total_latency: started.elapsed(),
        });
    }
}
