use std::sync::Arc;

use super::{HttpEmbeddingProvider, OpenAiEmbeddingProvider};
use crate::config::{EmbeddingConfig, EmbeddingProviderKind};
use crate::domain::{DomainError, EmbeddingProvider};
use crate::infrastructure::http_client::HttpClient;

/// Factory for creating embedding providers
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    /// Create an embedding provider from configuration
    pub fn create(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        let http_client = HttpClient::with_timeout(config.timeout())?;
        let api_key = config.resolved_api_key();

        match config.provider {
            EmbeddingProviderKind::OpenAi => {
                let provider = match config.url {
                    Some(ref base_url) => OpenAiEmbeddingProvider::with_base_url(
                        http_client,
                        api_key,
                        base_url,
                        &config.model,
                    ),
                    None => {
                        let api_key = api_key.ok_or_else(|| {
                            DomainError::configuration(
                                "embedding.api_key or EMBEDDING_API_KEY is required for OpenAI",
                            )
                        })?;
                        OpenAiEmbeddingProvider::new(http_client, api_key, &config.model)
                    }
                };

                Ok(Arc::new(provider.with_dimensions(config.dimensions)))
            }

            EmbeddingProviderKind::Http => {
                let url = config.url.as_ref().ok_or_else(|| {
                    DomainError::configuration("embedding.url is required for the http provider")
                })?;

                let provider =
                    HttpEmbeddingProvider::new(http_client, url, &config.model).with_api_key(api_key);
                Ok(Arc::new(provider))
            }
        }
    }
}
