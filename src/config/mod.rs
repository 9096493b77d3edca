//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, BatchConfig, CacheConfig, CompletionConfig, CompletionProviderKind,
    EmbeddingConfig, EmbeddingProviderKind, IndexConfig, IndexProviderKind, LogFormat,
    LoggingConfig, RetrievalConfig, ServerConfig, WarmupConfig,
};
