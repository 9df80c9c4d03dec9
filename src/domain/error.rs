use thiserror::Error;

/// Core domain errors
///
/// Collaborator failures (`Embedding`, `Index`, `Llm`) and timeouts are retryable and are
/// normally absorbed inside the pipeline. Only `InvalidInput`, `Synthesis` and `Timeout`
/// reach callers of the pipeline entry point.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Embedding error: {message}")]
    Embedding { message: String },

    #[error("Index error: {message}")]
    Index { message: String },

    #[error("LLM error: {message}")]
    Llm { message: String },

    #[error("Synthesis error: {message}")]
    Synthesis { message: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    pub fn index(message: impl Into<String>) -> Self {
        Self::Index {
            message: message.into(),
        }
    }

    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable, machine-readable kind used in API responses and telemetry
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::Embedding { .. } => "embedding_error",
            Self::Index { .. } => "index_error",
            Self::Llm { .. } => "llm_error",
            Self::Synthesis { .. } => "synthesis_error",
            Self::Timeout { .. } => "timeout",
            Self::Configuration { .. } => "configuration_error",
            Self::Internal { .. } => "internal_error",
        }
    }

    /// Whether a bounded retry may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Embedding { .. } | Self::Index { .. } | Self::Llm { .. } | Self::Timeout { .. }
        )
    }

    /// The message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput { message }
            | Self::Embedding { message }
            | Self::Index { message }
            | Self::Llm { message }
            | Self::Synthesis { message }
            | Self::Timeout { message }
            | Self::Configuration { message }
            | Self::Internal { message } => message,
        }
    }
}
