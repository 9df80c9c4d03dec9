//! User queries and the sub-queries derived from them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A natural-language compliance question submitted by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    user_id: String,
    submitted_at: DateTime<Utc>,
}

impl Query {
    /// Create a query stamped with the current time
    pub fn new(text: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::with_timestamp(text, user_id, Utc::now())
    }

    pub fn with_timestamp(
        text: impl Into<String>,
        user_id: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            text: text.into(),
            user_id: user_id.into(),
            submitted_at,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Reject empty, whitespace-only or oversized query text
    pub fn validate(&self, max_chars: usize) -> Result<(), DomainError> {
        if self.text.trim().is_empty() {
            return Err(DomainError::invalid_input("Query text cannot be empty"));
        }

        let length = self.text.chars().count();

        if length > max_chars {
            return Err(DomainError::invalid_input(format!(
                "Query text is {} characters, maximum is {}",
                length, max_chars
            )));
        }

        Ok(())
    }
}

/// A focused sub-question produced by decomposition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuery {
    text: String,
    origin_index: usize,
}

impl SubQuery {
    pub fn new(text: impl Into<String>, origin_index: usize) -> Self {
        Self {
            text: text.into(),
            origin_index,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Position of this sub-query in the decomposer output
    pub fn origin_index(&self) -> usize {
        self.origin_index
    }
}
