//! Pinecone data-plane query adapter

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::knowledge_base::{sort_by_score, IndexQuery, RetrievalMatch, VectorIndexProvider};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const TEXT_KEY: &str = "text";
const SUBJECT_KEY: &str = "subject";
const CHUNK_ID_KEY: &str = "chunk_id";

/// Queries one Pinecone index; the subject is used as the namespace
#[derive(Debug)]
pub struct PineconeIndexProvider<C: HttpClientTrait> {
    client: C,
    host: String,
    api_key: String,
    api_version: String,
}

impl<C: HttpClientTrait> PineconeIndexProvider<C> {
    pub fn new(
        client: C,
        host: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        let host = host.into();
        let host = host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        Self {
            client,
            host,
            api_key: api_key.into(),
            api_version: api_version.into(),
        }
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.host)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Api-Key", self.api_key.as_str()),
            ("X-Pinecone-API-Version", self.api_version.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, query: &IndexQuery) -> serde_json::Value {
        serde_json::json!({
            "vector": query.vector,
            "topK": query.top_k,
            "namespace": query.namespace,
            "includeMetadata": query.include_metadata,
            "includeValues": false,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Vec<RetrievalMatch>, DomainError> {
        let response: PineconeQueryResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("pinecone", format!("Failed to parse query response: {}", e))
        })?;

        let mut matches: Vec<RetrievalMatch> =
            response.matches.into_iter().map(into_match).collect();
        sort_by_score(&mut matches);

        Ok(matches)
    }
}

fn into_match(m: PineconeMatch) -> RetrievalMatch {
    let mut metadata = m.metadata.unwrap_or_default();

    let text = match metadata.remove(TEXT_KEY) {
        Some(serde_json::Value::String(text)) => text,
        _ => String::new(),
    };

    let mut result = RetrievalMatch::new(m.id, text, m.score);

    if let Some(serde_json::Value::String(subject)) = metadata.remove(SUBJECT_KEY) {
        result = result.with_subject(subject);
    }

    // Pinecone stores numeric metadata as floats
    if let Some(chunk_id) = metadata.remove(CHUNK_ID_KEY).and_then(|v| {
        v.as_u64()
            .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
    }) {
        result = result.with_chunk_id(chunk_id);
    }

    result.metadata = metadata;
    result
}

#[async_trait]
impl<C: HttpClientTrait> VectorIndexProvider for PineconeIndexProvider<C> {
    fn provider_type(&self) -> &'static str {
        "pinecone"
    }

    async fn query(&self, query: IndexQuery) -> Result<Vec<RetrievalMatch>, DomainError> {
        let body = self.build_request(&query);
        let response = self
            .client
            .post_json(&self.query_url(), self.headers(), &body)
            .await
            .map_err(|e| match e {
                DomainError::Provider { message, .. } => DomainError::provider("pinecone", message),
                other => other,
            })?;

        self.parse_response(response)
    }
}

#[derive(Debug, Deserialize)]
struct PineconeQueryResponse {
    #[serde(default)]
    matches: Vec<PineconeMatch>,
}

#[derive(Debug, Deserialize)]
struct PineconeMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<HashMap<String, serde_json::Value>>,
}
