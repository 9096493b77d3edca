//! Embedding provider implementations

mod factory;
mod http;
mod openai;

pub use factory::EmbeddingProviderFactory;
pub use http::HttpEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;
