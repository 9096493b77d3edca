//! Tutor RAG
//!
//! Retrieval-augmented answers over subject-specific study material:
//! - Question embeddings cached on disk, keyed by MD5 of the text
//! - Vector index lookup per subject namespace
//! - Threshold context selection with a top-ranked fallback
//! - Completion over a persona prompt, single or batched

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::{ContextSelector, EmbeddingCache};
use infrastructure::{
    cache::JsonFileEmbeddingCache,
    embedding::EmbeddingProviderFactory,
    knowledge_base::IndexProviderFactory,
    llm::CompletionProviderFactory,
    services::{
        AnswerService, AnswerServiceConfig, EmbeddingService, EmbeddingServiceConfig,
        WarmupService,
    },
};

/// Fully wired services for one process
#[derive(Debug, Clone)]
pub struct Services {
    pub cache: Arc<JsonFileEmbeddingCache>,
    pub embeddings: EmbeddingService,
    pub answers: Arc<AnswerService>,
    pub warmup: WarmupService,
}

impl Services {
    /// Validate the configuration, load the cache file and build every provider
    pub async fn build(config: &AppConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let cache = Arc::new(JsonFileEmbeddingCache::new(&config.cache.path));
        cache.load().await;

        let embedding_provider = EmbeddingProviderFactory::create(&config.embedding)?;
        let index = IndexProviderFactory::create(&config.index).await?;
        let completion = CompletionProviderFactory::create(&config.completion)?;

        info!(
            embedding = embedding_provider.provider_name(),
            index = index.provider_type(),
            completion = completion.provider_name(),
            model = completion.model(),
            "Providers configured"
        );

        let embeddings = EmbeddingService::new(
            embedding_provider,
            cache.clone() as Arc<dyn EmbeddingCache>,
            EmbeddingServiceConfig {
                dimensions: config.embedding.dimensions,
                timeout: config.embedding.timeout(),
                persist_every: config.cache.persist_every,
            },
        );

        let answers = AnswerService::new(
            embeddings.clone(),
            index,
            completion,
            ContextSelector::new(config.retrieval.context_selection()),
            config.retrieval.prompt_builder()?,
            AnswerServiceConfig {
                default_top_k: config.retrieval.top_k,
                max_concurrency: config.batch.max_concurrency,
                index_timeout: config.index.timeout(),
                completion_timeout: config.completion.timeout(),
                generation: config.completion.generation(),
            },
        );

        let warmup = WarmupService::new(embeddings.clone(), config.warmup.queries.clone());

        Ok(Self {
            cache,
            embeddings,
            answers: Arc::new(answers),
            warmup,
        })
    }

    /// State for the HTTP router
    pub fn app_state(&self) -> AppState {
        AppState::new(self.answers.clone(), self.cache.clone())
    }
}
