//! Embedding vectors and where they came from

use serde::{Deserialize, Serialize};

/// Where an embedding for a question was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingSource {
    /// Served from the embedding cache
    Cache,
    /// Computed by the embedding provider
    Provider,
    /// Provider failed; a zero vector was substituted
    Fallback,
}

/// A question embedding together with its source
#[derive(Debug, Clone)]
pub struct EmbeddedQuestion {
    vector: Vec<f32>,
    source: EmbeddingSource,
}

impl EmbeddedQuestion {
    pub fn new(vector: Vec<f32>, source: EmbeddingSource) -> Self {
        Self { vector, source }
    }

    /// Zero vector of the given dimensionality
    pub fn fallback(dimensions: usize) -> Self {
        Self::new(vec![0.0; dimensions], EmbeddingSource::Fallback)
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn into_vector(self) -> Vec<f32> {
        self.vector
    }

    pub fn source(&self) -> EmbeddingSource {
        self.source
    }

    pub fn is_cache_hit(&self) -> bool {
        self.source == EmbeddingSource::Cache
    }

    pub fn is_fallback(&self) -> bool {
        self.source == EmbeddingSource::Fallback
    }
}

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
