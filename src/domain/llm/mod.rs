//! Completion provider domain models and traits

mod provider;
mod request;
mod response;

pub use provider::CompletionProvider;
pub use request::{CompletionRequest, GenerationConfig};
pub use response::{CompletionResponse, FinishReason, Usage};

#[cfg(test)]
pub use provider::mock::MockCompletionProvider;
