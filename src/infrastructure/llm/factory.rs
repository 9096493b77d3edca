use std::sync::Arc;

use super::{GeminiProvider, OpenAiCompletionProvider};
use crate::config::{CompletionConfig, CompletionProviderKind};
use crate::domain::{CompletionProvider, DomainError};
use crate::infrastructure::http_client::HttpClient;

/// Factory for creating completion providers
#[derive(Debug)]
pub struct CompletionProviderFactory;

impl CompletionProviderFactory {
    /// Create a completion provider from configuration
    pub fn create(config: &CompletionConfig) -> Result<Arc<dyn CompletionProvider>, DomainError> {
        let http_client = HttpClient::with_timeout(config.timeout())?;

        let api_key = config.resolved_api_key().ok_or_else(|| {
            let var = match config.provider {
                CompletionProviderKind::Gemini => "GEMINI_API_KEY",
                CompletionProviderKind::OpenAi => "OPENAI_API_KEY",
            };
            DomainError::configuration(format!("completion.api_key or {} is required", var))
        })?;

        match config.provider {
            CompletionProviderKind::Gemini => {
                let provider = match config.base_url {
                    Some(ref base_url) => {
                        GeminiProvider::with_base_url(http_client, api_key, base_url, &config.model)
                    }
                    None => GeminiProvider::new(http_client, api_key, &config.model),
                };
                Ok(Arc::new(provider))
            }

            CompletionProviderKind::OpenAi => {
                let provider = match config.base_url {
                    Some(ref base_url) => OpenAiCompletionProvider::with_base_url(
                        http_client,
                        api_key,
                        base_url,
                        &config.model,
                    ),
                    None => OpenAiCompletionProvider::new(http_client, api_key, &config.model),
                };
                Ok(Arc::new(provider))
            }
        }
    }
}
