//! In-memory vector index for development and testing

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::embedding::cosine_similarity;
use crate::domain::knowledge_base::{sort_by_score, IndexQuery, RetrievalMatch, VectorIndexProvider};
use crate::domain::DomainError;

/// One indexed chunk, as stored in a JSON snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub id: String,
    pub subject: String,
    pub text: String,
    #[serde(default)]
    pub chunk_id: Option<u64>,
    #[serde(alias = "values")]
    pub vector: Vec<f32>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Brute-force cosine index partitioned by subject
#[derive(Debug, Default)]
pub struct InMemoryIndexProvider {
    records: Arc<RwLock<Vec<IndexRecord>>>,
}

impl InMemoryIndexProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<IndexRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Load a snapshot file containing a JSON array of records
    pub async fn from_snapshot(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::configuration(format!(
                "Failed to read index snapshot {}: {}",
                path.display(),
                e
            ))
        })?;

        let records: Vec<IndexRecord> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::configuration(format!(
                "Invalid index snapshot {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self::with_records(records))
    }

    pub async fn insert(&self, record: IndexRecord) {
        self.records.write().await.push(record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl VectorIndexProvider for InMemoryIndexProvider {
    fn provider_type(&self) -> &'static str {
        "in_memory"
    }

    async fn query(&self, query: IndexQuery) -> Result<Vec<RetrievalMatch>, DomainError> {
        let records = self.records.read().await;

        let mut matches: Vec<RetrievalMatch> = records
            .iter()
            .filter(|record| record.subject == query.namespace)
            .filter(|record| record.vector.len() == query.vector.len())
            .map(|record| {
                let score = cosine_similarity(&query.vector, &record.vector);
                let mut result = RetrievalMatch::new(&record.id, &record.text, score)
                    .with_subject(&record.subject);

                if let Some(chunk_id) = record.chunk_id {
                    result = result.with_chunk_id(chunk_id);
                }

                if query.include_metadata {
                    result.metadata = record.metadata.clone();
                }

                result
            })
            .collect();

        sort_by_score(&mut matches);
        matches.truncate(query.top_k as usize);

        Ok(matches)
    }
}
