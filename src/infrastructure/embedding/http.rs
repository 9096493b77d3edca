//! Plain HTTP embedding endpoint
//!
//! Posts `{"text": "..."}` and accepts either a bare JSON array of floats or
//! an object with an `embedding` array, which covers hosted
//! sentence-transformer functions.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EndpointResponse {
    Bare(Vec<f32>),
    Wrapped { embedding: Vec<f32> },
}

#[derive(Debug)]
pub struct HttpEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    url: String,
    model: String,
    auth_header: Option<String>,
}

impl<C: HttpClientTrait> HttpEmbeddingProvider<C> {
    pub fn new(client: C, url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            model: model.into(),
            auth_header: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.auth_header = api_key
            .filter(|key| !key.is_empty())
            .map(|key| format!("Bearer {}", key));
        self
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(ref auth) = self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }
        headers
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for HttpEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let body = serde_json::json!({ "text": text });
        let response = self.client.post_json(&self.url, self.headers(), &body).await?;

        let parsed: EndpointResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("http", format!("Unexpected embedding response: {}", e))
        })?;

        Ok(match parsed {
            EndpointResponse::Bare(vector) => vector,
            EndpointResponse::Wrapped { embedding } => embedding,
        })
    }

    fn provider_name(&self) -> &'static str {
        "http"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
