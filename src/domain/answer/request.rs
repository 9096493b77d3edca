//! Incoming questions for the answer pipeline

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A single question to answer against one subject namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub subject: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl AnswerRequest {
    pub fn new(subject: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            question: question.into(),
            top_k: None,
        }
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Reject blank fields before any external call is made
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.question.trim().is_empty() {
            return Err(DomainError::validation("Missing question"));
        }

        if self.subject.trim().is_empty() {
            return Err(DomainError::validation("Missing subject"));
        }

        if self.top_k == Some(0) {
            return Err(DomainError::validation("top_k must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        assert!(AnswerRequest::new("CN", "what is tcp").validate().is_ok());
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert!(AnswerRequest::new("CN", "   ").validate().is_err());
        assert!(AnswerRequest::new("", "what is tcp").validate().is_err());
        assert!(
            AnswerRequest::new("CN", "what is tcp")
                .with_top_k(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_deserialize_without_top_k() {
        let request: AnswerRequest =
            serde_json::from_str(r#"{"subject":"OS","question":"explain deadlock"}"#).unwrap();
        assert_eq!(request.top_k, None);
    }
}
