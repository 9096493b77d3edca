//! Stage timings and per-request outcomes

use std::time::Duration;

use serde::Serialize;

use super::{AnswerFailure, AnswerStage};
use crate::domain::context::ContextChunk;

/// Wall-clock time spent in each external call, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnswerTiming {
    pub embed_ms: u64,
    pub query_ms: u64,
    pub completion_ms: u64,
    pub total_ms: u64,
}

impl AnswerTiming {
    /// Total time formatted as seconds, e.g. `1.23s`
    pub fn response_time(&self) -> String {
        format!("{:.2}s", self.total_ms as f64 / 1000.0)
    }
}

pub(crate) fn millis(duration: Duration) -> u64 {
    duration.as_millis().min(u128::from(u64::MAX)) as u64
}

/// Outcome of a successful answer pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
    pub question: String,
    pub subject: String,
    pub answer: String,
    pub model: String,
    pub timing: AnswerTiming,
    pub cache_hit: bool,
    /// The embedding service failed and a zero vector was used
    pub embedding_fallback: bool,
    pub context: Vec<ContextChunk>,
    /// No match cleared the score threshold
    pub context_fell_back: bool,
    pub context_truncated: bool,
}

/// Raw follow-up text plus the numbered questions parsed out of it
#[derive(Debug, Clone, Serialize)]
pub struct FollowupResult {
    pub question: String,
    pub subject: String,
    pub text: String,
    pub questions: Vec<String>,
    pub completion_ms: u64,
}

/// One entry of a batch response, in input order
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchItemResult {
    Answered(AnswerResult),
    Failed {
        question: String,
        error: String,
        stage: AnswerStage,
    },
}

impl BatchItemResult {
    pub fn failed(question: impl Into<String>, failure: &AnswerFailure) -> Self {
        Self::Failed {
            question: question.into(),
            error: failure.to_string(),
            stage: failure.stage,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Answered(_))
    }

    pub fn question(&self) -> &str {
        match self {
            Self::Answered(result) => &result.question,
            Self::Failed { question, .. } => question,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_response_time_format() {
        let timing = AnswerTiming {
            total_ms: 1234,
            ..Default::default()
        };
        assert_eq!(timing.response_time(), "1.23s");
    }

    #[test]
    fn test_failed_entry_serialization() {
        let failure = AnswerFailure::new(
            AnswerStage::QueryIndex,
            DomainError::provider("pinecone", "unavailable"),
        );
        let item = BatchItemResult::failed("what is tcp", &failure);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["question"], "what is tcp");
        assert_eq!(json["error"], "Provider error: pinecone - unavailable");
        assert_eq!(json["stage"], "QUERY_INDEX");
        assert!(!item.is_ok());
    }
}
