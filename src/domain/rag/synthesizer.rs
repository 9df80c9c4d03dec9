//! Answer synthesis - grounded prompt construction and citation mapping

use std::sync::Arc;

use tracing::{debug, info};

use super::config::PipelineConfig;
use crate::domain::compliance::{CitationEntry, CitationMap, Passage, Query};
use crate::domain::llm::{CompletionRequest, LlmClient};
use crate::domain::DomainError;

/// Output of the synthesize stage
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOutput {
    pub answer: String,
    /// One entry per passage placed in the prompt
    pub citations: CitationMap,
    /// Passages handed to the synthesizer, before any budget truncation
    pub context_passages: usize,
}

#[derive(Debug, Clone)]
pub struct Synthesizer {
    llm: Arc<dyn LlmClient>,
    config: PipelineConfig,
}

impl Synthesizer {
    pub fn new(llm: Arc<dyn LlmClient>, config: PipelineConfig) -> Self {
        Self { llm, config }
    }

    /// Answer `query` from `passages` (best match first)
    ///
    /// An empty passage set is answered with an explicit no-context prompt.
    /// LLM failures surface as `DomainError::Synthesis`.
    pub async fn synthesize(
        &self,
        query: &Query,
        passages: &[Passage],
    ) -> Result<SynthesisOutput, DomainError> {
        let blocks = select_context_blocks(passages, self.config.max_context_chars);

        let prompt = if blocks.is_empty() {
            build_no_context_prompt(query.text())
        } else {
            build_grounded_prompt(query.text(), &blocks)
        };

        if blocks.len() < passages.len() {
            debug!(
                included = blocks.len(),
                retrieved = passages.len(),
                budget = self.config.max_context_chars,
                "Context budget truncated passages"
            );
        }

        let request = CompletionRequest::builder()
            .prompt(prompt)
            .max_tokens(self.config.synthesis_max_tokens)
            .temperature(self.config.synthesis_temperature)
            .build();

        let answer = self
            .llm
            .complete(request)
            .await
            .map_err(|e| DomainError::synthesis(e.to_string()))?;

        let mut citations = CitationMap::new();

        for (index, passage) in passages.iter().take(blocks.len()).enumerate() {
            citations.push(CitationEntry::from_passage(
                CitationMap::label_for(index),
                passage,
                self.config.distance_normalizer,
                self.config.snippet_chars,
            ));
        }

        info!(citations = citations.len(), "Synthesized answer");

        Ok(SynthesisOutput {
            answer: answer.trim().to_string(),
            citations,
            context_passages: passages.len(),
        })
    }
}

/// Label each passage as a numbered source block, keeping the longest prefix
/// that fits in `budget` characters
///
/// A first block that alone exceeds the budget is cut down rather than dropped.
fn select_context_blocks(passages: &[Passage], budget: usize) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut used = 0;

    for (index, passage) in passages.iter().enumerate() {
        let header = format_block_header(&CitationMap::label_for(index), passage);
        let block = format!("{}\n{}", header, passage.text.trim());
        let length = block.chars().count();

        if used + length <= budget {
            used += length;
            blocks.push(block);
            continue;
        }

        if blocks.is_empty() {
            blocks.push(block.chars().take(budget.max(header.chars().count())).collect());
        }

        break;
    }

    blocks
}

fn format_block_header(label: &str, passage: &Passage) -> String {
    let effective = passage
        .effective_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    format!(
        "[{}] Document: {}, Section: {}, Jurisdiction: {}, Effective: {}",
        label, passage.document_id, passage.section_number, passage.jurisdiction, effective
    )
}

fn build_grounded_prompt(query: &str, blocks: &[String]) -> String {
    format!(
        "You are a regulatory compliance expert. Answer this question using ONLY the provided sources.\n\n\
         Question: {}\n\n\
         Sources:\n{}\n\n\
         Instructions:\n\
         1. Answer directly and accurately\n\
         2. Cite sources by their label, e.g. [source_1]\n\
         3. If information is missing, state it clearly\n\
         4. Be concise but complete\n\n\
         Answer:",
        query.trim(),
        blocks.join("\n\n")
    )
}

fn build_no_context_prompt(query: &str) -> String {
    format!(
        "You are a regulatory compliance expert.\n\n\
         Question: {}\n\n\
         No relevant context was found in the regulatory knowledge base for this question.\n\n\
         Instructions:\n\
         1. State clearly that no relevant sources were found\n\
         2. Do not cite sources or invent regulatory references\n\
         3. Describe what information would be needed to answer\n\n\
         Answer:",
        query.trim()
    )
}
