use std::time::Duration;

use serde::Deserialize;

use crate::domain::prompt::{DEFAULT_ANSWER_TEMPLATE, DEFAULT_FOLLOWUP_TEMPLATE, DEFAULT_PERSONA};
use crate::domain::{ContextSelectionConfig, DomainError, GenerationConfig, PromptBuilder};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cache: CacheConfig,
    pub embedding: EmbeddingConfig,
    pub index: IndexConfig,
    pub completion: CompletionConfig,
    pub retrieval: RetrievalConfig,
    pub batch: BatchConfig,
    pub warmup: WarmupConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Backing JSON file for the embedding cache
    pub path: String,
    /// Persist in the background after this many new entries
    pub persist_every: usize,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    OpenAi,
    #[default]
    Http,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    /// Base URL for `open_ai`, full endpoint URL for `http`
    pub url: Option<String>,
    pub model: String,
    pub dimensions: usize,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndexProviderKind {
    #[default]
    Pinecone,
    InMemory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub provider: IndexProviderKind,
    /// Pinecone index host, e.g. `https://tutor-abc123.svc.pinecone.io`
    pub host: Option<String>,
    pub api_version: String,
    /// JSON snapshot for the in-memory index
    pub snapshot_path: Option<String>,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionProviderKind {
    #[default]
    Gemini,
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub provider: CompletionProviderKind,
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: u32,
    pub max_chunks: usize,
    pub min_score: f32,
    pub max_context_chars: usize,
    pub persona: String,
    pub answer_template: Option<String>,
    pub followup_template: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WarmupConfig {
    pub enabled: bool,
    pub queries: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: "embedding_cache.json".to_string(),
            persist_every: 10,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            url: None,
            model: "all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
            timeout_secs: 15,
            api_key: None,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            provider: IndexProviderKind::default(),
            host: None,
            api_version: "2024-07".to_string(),
            snapshot_path: None,
            timeout_secs: 10,
            api_key: None,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: CompletionProviderKind::default(),
            base_url: None,
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            max_output_tokens: 600,
            timeout_secs: 30,
            api_key: None,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            max_chunks: 2,
            min_score: 0.75,
            max_context_chars: 2000,
            persona: DEFAULT_PERSONA.to_string(),
            answer_template: None,
            followup_template: None,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_concurrency: 4 }
    }
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queries: [
                "what is tcp",
                "explain deadlock",
                "how does dns work",
                "what is normalization",
                "explain process scheduling",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Configured key, else the named environment variable
fn key_or_env(configured: &Option<String>, vars: &[&str]) -> Option<String> {
    configured
        .clone()
        .filter(|key| !key.is_empty())
        .or_else(|| {
            vars.iter()
                .find_map(|var| std::env::var(var).ok().filter(|key| !key.is_empty()))
        })
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn resolved_api_key(&self) -> Option<String> {
        key_or_env(&self.api_key, &["EMBEDDING_API_KEY"])
    }
}

impl IndexConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn resolved_api_key(&self) -> Option<String> {
        key_or_env(&self.api_key, &["PINECONE_API_KEY"])
    }
}

impl CompletionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn resolved_api_key(&self) -> Option<String> {
        match self.provider {
            CompletionProviderKind::Gemini => key_or_env(&self.api_key, &["GEMINI_API_KEY"]),
            CompletionProviderKind::OpenAi => key_or_env(&self.api_key, &["OPENAI_API_KEY"]),
        }
    }

    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            candidate_count: 1,
        }
    }
}

impl RetrievalConfig {
    pub fn context_selection(&self) -> ContextSelectionConfig {
        ContextSelectionConfig::default()
            .with_min_score(self.min_score)
            .with_max_chunks(self.max_chunks)
            .with_max_chars(self.max_context_chars)
    }

    pub fn prompt_builder(&self) -> Result<PromptBuilder, DomainError> {
        PromptBuilder::new(
            self.persona.clone(),
            self.answer_template
                .as_deref()
                .unwrap_or(DEFAULT_ANSWER_TEMPLATE),
            self.followup_template
                .as_deref()
                .unwrap_or(DEFAULT_FOLLOWUP_TEMPLATE),
        )
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        self.retrieval.context_selection().validate()?;
        self.retrieval.prompt_builder()?;

        if self.retrieval.top_k == 0 {
            return Err(DomainError::configuration("retrieval.top_k must be at least 1"));
        }

        if self.embedding.dimensions == 0 {
            return Err(DomainError::configuration(
                "embedding.dimensions must be at least 1",
            ));
        }

        if self.batch.max_concurrency == 0 {
            return Err(DomainError::configuration(
                "batch.max_concurrency must be at least 1",
            ));
        }

        if self.cache.persist_every == 0 {
            return Err(DomainError::configuration(
                "cache.persist_every must be at least 1",
            ));
        }

        Ok(())
    }
}
