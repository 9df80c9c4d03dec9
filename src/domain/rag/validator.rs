//! Answer validation gates

use tracing::{debug, warn};

use super::config::PipelineConfig;
use super::result::RejectionReason;
use super::synthesizer::SynthesisOutput;

/// Accept/reject decision for a synthesized answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub accepted: bool,
    pub reason: Option<RejectionReason>,
}

impl ValidationVerdict {
    fn accept() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    fn reject(reason: RejectionReason) -> Self {
        Self {
            accepted: false,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnswerValidator {
    min_answer_chars: usize,
    refusal_patterns: Vec<String>,
}

impl AnswerValidator {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            min_answer_chars: config.min_answer_chars,
            refusal_patterns: config
                .refusal_patterns
                .iter()
                .map(|p| normalize(p))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Apply every gate; the first failing one names the rejection reason
    pub fn validate(&self, output: &SynthesisOutput) -> ValidationVerdict {
        let answer = output.answer.trim();
        let normalized = normalize(answer);

        if self.refusal_patterns.iter().any(|p| *p == normalized) {
            warn!("Answer matches a refusal pattern");
            return ValidationVerdict::reject(RejectionReason::RefusalAnswer);
        }

        let length = answer.chars().count();

        if length < self.min_answer_chars {
            warn!(length, minimum = self.min_answer_chars, "Answer too short");
            return ValidationVerdict::reject(RejectionReason::AnswerTooShort);
        }

        // An empty-context answer legitimately carries no citations.
        if output.context_passages > 0 && output.citations.is_empty() {
            warn!(context_passages = output.context_passages, "Answer has no citations");
            return ValidationVerdict::reject(RejectionReason::MissingCitations);
        }

        debug!("Validation passed");
        ValidationVerdict::accept()
    }
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches(['.', '!'])
        .trim()
        .to_lowercase()
}
