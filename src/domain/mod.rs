//! Domain layer - Core business logic and entities

pub mod answer;
pub mod context;
pub mod embedding;
pub mod error;
pub mod knowledge_base;
pub mod llm;
pub mod prompt;

pub use answer::{
    AnswerFailure, AnswerRequest, AnswerResult, AnswerStage, AnswerTiming, BatchItemResult,
    FollowupResult,
};
pub use context::{ContextChunk, ContextSelectionConfig, ContextSelector, SelectedContext};
pub use embedding::{
    CacheStats, EmbeddedQuestion, EmbeddingCache, EmbeddingKey, EmbeddingProvider,
    EmbeddingSource,
};
pub use error::DomainError;
pub use knowledge_base::{IndexQuery, RetrievalMatch, VectorIndexProvider};
pub use llm::{
    CompletionProvider, CompletionRequest, CompletionResponse, FinishReason, GenerationConfig,
    Usage,
};
pub use prompt::{parse_followups, PromptBuilder, PromptTemplate, TemplateError};
