//! Vector index domain - nearest-neighbour search over passage vectors

mod client;

pub use client::{SearchRequest, VectorIndexClient};

#[cfg(test)]
pub use client::mock::MockVectorIndexClient;
