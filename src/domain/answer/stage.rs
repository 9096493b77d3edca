use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::domain::DomainError;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerStage {
    Validate,
    Embed,
    QueryIndex,
    SelectContext,
    BuildPrompt,
    Complete,
    Done,
}

impl AnswerStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validate => "VALIDATE",
            Self::Embed => "EMBED",
            Self::QueryIndex => "QUERY_INDEX",
            Self::SelectContext => "SELECT_CONTEXT",
            Self::BuildPrompt => "BUILD_PROMPT",
            Self::Complete => "COMPLETE",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for AnswerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request that short-circuited at `stage`
#[derive(Debug, Error)]
#[error("{error}")]
pub struct AnswerFailure {
    pub stage: AnswerStage,
    #[source]
    pub error: DomainError,
}

impl AnswerFailure {
    pub fn new(stage: AnswerStage, error: DomainError) -> Self {
        Self { stage, error }
    }

    pub fn into_error(self) -> DomainError {
        self.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(AnswerStage::Embed < AnswerStage::QueryIndex);
        assert!(AnswerStage::QueryIndex < AnswerStage::SelectContext);
        assert!(AnswerStage::BuildPrompt < AnswerStage::Complete);
        assert!(AnswerStage::Complete < AnswerStage::Done);
    }

    #[test]
    fn test_failure_message_is_error_message() {
        let failure = AnswerFailure::new(
            AnswerStage::Complete,
            DomainError::provider("gemini", "quota exceeded"),
        );

        assert_eq!(failure.to_string(), "Provider error: gemini - quota exceeded");
        assert_eq!(failure.stage.to_string(), "COMPLETE");
    }
}
