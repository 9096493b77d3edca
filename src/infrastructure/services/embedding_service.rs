//! Cached question embedding with zero-vector fallback

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::embedding::{
    EmbeddedQuestion, EmbeddingCache, EmbeddingKey, EmbeddingProvider, EmbeddingSource,
};
use crate::domain::DomainError;

/// Configuration for the embedding service
#[derive(Debug, Clone)]
pub struct EmbeddingServiceConfig {
    /// Length every vector must have; also the fallback length
    pub dimensions: usize,
    /// Upper bound for a single provider call
    pub timeout: Duration,
    /// Spawn a background persist once this many entries are unsaved
    pub persist_every: usize,
}

impl Default for EmbeddingServiceConfig {
    fn default() -> Self {
        Self {
            dimensions: 384,
            timeout: Duration::from_secs(15),
            persist_every: 10,
        }
    }
}

/// Resolves question text to a vector through the cache, then the provider.
///
/// Provider failures never surface: a timeout, error, or wrong-length vector
/// yields a zero vector of the configured length, which is not cached.
#[derive(Debug, Clone)]
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    cache: Arc<dyn EmbeddingCache>,
    config: EmbeddingServiceConfig,
    persisting: Arc<AtomicBool>,
}

impl EmbeddingService {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        cache: Arc<dyn EmbeddingCache>,
        config: EmbeddingServiceConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
            persisting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Embed a question, consulting the cache first
    pub async fn embed_question(&self, text: &str) -> EmbeddedQuestion {
        let key = EmbeddingKey::from_text(text);

        if let Some(vector) = self.cache.get(&key).await {
            debug!(key = %key, "Embedding cache hit");
            return EmbeddedQuestion::new(vector, EmbeddingSource::Cache);
        }

        match self.fetch(text).await {
            Ok(vector) => {
                self.cache.put(key, vector.clone()).await;
                self.schedule_persist();
                EmbeddedQuestion::new(vector, EmbeddingSource::Provider)
            }
            Err(e) => {
                warn!(
                    provider = self.provider.provider_name(),
                    error = %e,
                    "Embedding failed, using zero vector"
                );
                EmbeddedQuestion::fallback(self.config.dimensions)
            }
        }
    }

    /// Write the cache out now; used at shutdown and after warmup
    pub async fn persist(&self) -> Result<usize, DomainError> {
        self.cache.persist().await
    }

    async fn fetch(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let vector = tokio::time::timeout(self.config.timeout, self.provider.embed(text))
            .await
            .map_err(|_| DomainError::timeout("embedding", self.config.timeout))??;

        if vector.len() != self.config.dimensions {
            return Err(DomainError::provider(
                self.provider.provider_name(),
                format!(
                    "expected {} dimensions, got {}",
                    self.config.dimensions,
                    vector.len()
                ),
            ));
        }

        if vector.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::provider(
                self.provider.provider_name(),
                "embedding contains non-finite values",
            ));
        }

        Ok(vector)
    }

    /// Persist in the background once enough entries are unsaved.
    ///
    /// At most one background persist is in flight per service.
    fn schedule_persist(&self) {
        if self.cache.pending_writes() < self.config.persist_every {
            return;
        }

        if self
            .persisting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let cache = Arc::clone(&self.cache);
        let persisting = Arc::clone(&self.persisting);

        tokio::spawn(async move {
            if let Err(e) = cache.persist().await {
                warn!(error = %e, "Background embedding cache persist failed");
            }
            persisting.store(false, Ordering::SeqCst);
        });
    }
}
