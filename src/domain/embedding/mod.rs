//! Embedding domain models and traits

mod cache;
mod key;
mod provider;
mod vector;

pub use cache::{CacheStats, EmbeddingCache};
pub use key::EmbeddingKey;
pub use provider::EmbeddingProvider;
pub use vector::{cosine_similarity, EmbeddedQuestion, EmbeddingSource};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
