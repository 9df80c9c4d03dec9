//! Vector index client implementations

mod config;
mod in_memory;
mod qdrant;

pub use config::{VectorIndexConfig, VectorIndexKind};
pub use in_memory::InMemoryVectorIndex;
pub use qdrant::QdrantIndexClient;
