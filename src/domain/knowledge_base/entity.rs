//! Retrieval match and index query types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single nearest-neighbour hit returned by the vector index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalMatch {
    /// Identifier of the chunk in the index
    pub id: String,
    /// Similarity score, higher is more similar
    pub score: f32,
    /// Chunk text
    pub text: String,
    /// Subject/namespace label the chunk was indexed under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Position of the chunk within its source document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<u64>,
    /// Remaining index metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RetrievalMatch {
    /// Create a new match
    pub fn new(id: impl Into<String>, text: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
            text: text.into(),
            subject: None,
            chunk_id: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_chunk_id(mut self, chunk_id: u64) -> Self {
        self.chunk_id = Some(chunk_id);
        self
    }
}

/// Nearest-neighbour query against one subject namespace
#[derive(Debug, Clone)]
pub struct IndexQuery {
    pub vector: Vec<f32>,
    pub top_k: u32,
    pub namespace: String,
    pub include_metadata: bool,
}

impl IndexQuery {
    pub fn new(vector: Vec<f32>, top_k: u32, namespace: impl Into<String>) -> Self {
        Self {
            vector,
            top_k,
            namespace: namespace.into(),
            include_metadata: true,
        }
    }
}

/// Sort matches by descending score, the order every provider must return.
///
/// NaN scores sort last.
pub fn sort_by_score(matches: &mut [RetrievalMatch]) {
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or_else(|| a.score.is_nan().cmp(&b.score.is_nan()))
    });
}
