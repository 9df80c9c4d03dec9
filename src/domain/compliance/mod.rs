//! Compliance domain - queries, passages and citations flowing through the pipeline

mod citation;
mod passage;
mod query;

pub use citation::{relevance_score, snippet, CitationEntry, CitationMap};
pub use passage::{Passage, UNKNOWN_JURISDICTION, UNKNOWN_SECTION};
pub use query::{Query, SubQuery};
