use std::sync::Arc;

use super::{InMemoryIndexProvider, PineconeIndexProvider};
use crate::config::{IndexConfig, IndexProviderKind};
use crate::domain::{DomainError, VectorIndexProvider};
use crate::infrastructure::http_client::HttpClient;

/// Factory for creating vector index providers
#[derive(Debug)]
pub struct IndexProviderFactory;

impl IndexProviderFactory {
    /// Create an index provider from configuration.
    ///
    /// Async because the in-memory provider reads its snapshot up front.
    pub async fn create(config: &IndexConfig) -> Result<Arc<dyn VectorIndexProvider>, DomainError> {
        match config.provider {
            IndexProviderKind::Pinecone => {
                let host = config.host.as_ref().ok_or_else(|| {
                    DomainError::configuration("index.host is required for Pinecone")
                })?;
                let api_key = config.resolved_api_key().ok_or_else(|| {
                    DomainError::configuration("index.api_key or PINECONE_API_KEY is required")
                })?;

                let client = HttpClient::with_timeout(config.timeout())?;
                Ok(Arc::new(PineconeIndexProvider::new(
                    client,
                    host,
                    api_key,
                    &config.api_version,
                )))
            }

            IndexProviderKind::InMemory => match config.snapshot_path {
                Some(ref path) => Ok(Arc::new(InMemoryIndexProvider::from_snapshot(path).await?)),
                None => Ok(Arc::new(InMemoryIndexProvider::new())),
            },
        }
    }
}
