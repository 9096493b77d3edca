use async_trait::async_trait;
use std::fmt::Debug;

use super::{CompletionRequest, CompletionResponse};
use crate::domain::DomainError;

/// Trait for text-completion providers (Gemini, OpenAI, etc.)
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug {
    /// Generate text for a fully assembled prompt
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the model used for completions
    fn model(&self) -> &str;
}
