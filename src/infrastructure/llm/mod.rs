//! Completion provider implementations

mod factory;
mod gemini;
mod openai;

pub use factory::CompletionProviderFactory;
pub use gemini::GeminiProvider;
pub use openai::OpenAiCompletionProvider;
