//! Query decomposition - splits a compliance question into focused sub-queries

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use super::config::PipelineConfig;
use super::retry::retry_with_backoff;
use crate::domain::compliance::{Query, SubQuery};
use crate::domain::llm::{CompletionRequest, LlmClient};
use crate::domain::DomainError;

/// Numbered (`1.`, `2)`, `Q3:`) or bulleted (`-`, `*`, `•`) list items
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\d{1,2}[.):]|[Qq]\d{1,2}[.:)]|[-*•])\s+(.+?)\s*$")
        .unwrap_or_else(|e| panic!("invalid list item pattern: {}", e))
});

/// Output of the decompose stage
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub sub_queries: Vec<SubQuery>,
    /// Set when the original query was used as the only sub-query
    pub fallback_reason: Option<&'static str>,
}

impl Decomposition {
    fn fallback(query: &Query, reason: &'static str) -> Self {
        Self {
            sub_queries: vec![SubQuery::new(query.text().trim(), 0)],
            fallback_reason: Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct QueryDecomposer {
    llm: Arc<dyn LlmClient>,
    config: PipelineConfig,
}

impl QueryDecomposer {
    pub fn new(llm: Arc<dyn LlmClient>, config: PipelineConfig) -> Self {
        Self { llm, config }
    }

    /// Decompose `query` into 1..=`max_sub_queries` sub-queries
    ///
    /// Fails only on invalid input; LLM failures and unparseable completions
    /// fall back to the original query as the single sub-query.
    pub async fn decompose(&self, query: &Query) -> Result<Decomposition, DomainError> {
        query.validate(self.config.max_query_chars)?;

        let request = CompletionRequest::builder()
            .prompt(build_decomposition_prompt(query.text()))
            .max_tokens(self.config.decompose_max_tokens)
            .temperature(self.config.decompose_temperature)
            .build();

        let completion = retry_with_backoff(&self.config.decompose_retry, "decompose", || {
            self.llm.complete(request.clone())
        })
        .await;

        let completion = match completion {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Decomposition failed, using original query");
                return Ok(Decomposition::fallback(query, e.kind()));
            }
        };

        let items = parse_sub_queries(&completion, self.config.max_sub_queries);

        if items.is_empty() {
            debug!("Decomposition produced no list items, using original query");
            return Ok(Decomposition::fallback(query, "empty_decomposition"));
        }

        info!(sub_queries = items.len(), "Decomposed query");

        Ok(Decomposition {
            sub_queries: items
                .into_iter()
                .enumerate()
                .map(|(index, text)| SubQuery::new(text, index))
                .collect(),
            fallback_reason: None,
        })
    }
}

fn build_decomposition_prompt(query: &str) -> String {
    format!(
        "Task: Break this regulatory question into 2-3 specific sub-questions.\n\n\
         Question: {}\n\n\
         Format: Return only numbered sub-questions, one per line.\n\n\
         Sub-questions:",
        query.trim()
    )
}

/// Extract list items from a completion, dropping case-insensitive duplicates
pub fn parse_sub_queries(completion: &str, max_items: usize) -> Vec<String> {
    let mut seen = HashSet::new();

    completion
        .lines()
        .filter_map(|line| LIST_ITEM.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .filter(|item| seen.insert(item.to_lowercase()))
        .take(max_items)
        .collect()
}
