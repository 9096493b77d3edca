//! Context selection configuration

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Configuration for choosing which retrieved chunks reach the prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSelectionConfig {
    /// Matches must score strictly above this to count as relevant
    #[serde(default = "default_min_score")]
    pub min_score: f32,
    /// Maximum number of chunks placed in the prompt
    #[serde(default = "default_max_chunks")]
    pub max_chunks: usize,
    /// Character budget for the concatenated context block
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    /// Separator placed between chunks
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Appended after the cut when the block exceeds `max_chars`
    #[serde(default = "default_truncation_marker")]
    pub truncation_marker: String,
}

fn default_min_score() -> f32 {
    0.75
}

fn default_max_chunks() -> usize {
    2
}

fn default_max_chars() -> usize {
    2000
}

fn default_separator() -> String {
    "\n\n".to_string()
}

fn default_truncation_marker() -> String {
    "...".to_string()
}

impl Default for ContextSelectionConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            max_chunks: default_max_chunks(),
            max_chars: default_max_chars(),
            separator: default_separator(),
            truncation_marker: default_truncation_marker(),
        }
    }
}

impl ContextSelectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Reject settings that would always produce an empty context
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_chunks == 0 {
            return Err(DomainError::configuration(
                "retrieval.max_chunks must be at least 1",
            ));
        }

        if self.max_chars == 0 {
            return Err(DomainError::configuration(
                "retrieval.max_context_chars must be at least 1",
            ));
        }

        if self.min_score.is_nan() {
            return Err(DomainError::configuration(
                "retrieval.min_score must be a number",
            ));
        }

        Ok(())
    }
}
