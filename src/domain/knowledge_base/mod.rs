//! Vector index domain models

mod entity;
mod provider;

pub use entity::{sort_by_score, IndexQuery, RetrievalMatch};
pub use provider::VectorIndexProvider;

#[cfg(test)]
pub use provider::mock::MockVectorIndex;
