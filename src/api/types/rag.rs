//! Request and response bodies for the question-answering endpoints

use serde::{Deserialize, Serialize};

use crate::domain::{
    AnswerRequest, AnswerResult, AnswerStage, AnswerTiming, BatchItemResult, CacheStats,
    ContextChunk, FollowupResult,
};

/// Body of `/api/ask` and `/api/followup`, and one batch item.
///
/// Fields are optional so a missing field is reported by request
/// validation rather than as a JSON parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub top_k: Option<u32>,
}

impl AskRequest {
    pub fn into_domain(self) -> AnswerRequest {
        AnswerRequest {
            subject: self.subject.unwrap_or_default(),
            question: self.question.unwrap_or_default(),
            top_k: self.top_k,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub answer: String,
    /// Total time, e.g. `1.42s`
    pub response_time: String,
    pub timing: AnswerTiming,
    pub cached: bool,
    pub sources: Vec<ContextChunk>,
}

impl From<AnswerResult> for AskResponse {
    fn from(result: AnswerResult) -> Self {
        Self {
            answer: result.answer,
            response_time: result.timing.response_time(),
            timing: result.timing,
            cached: result.cache_hit,
            sources: result.context,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowupResponse {
    /// Raw model text
    pub followups: String,
    pub questions: Vec<String>,
}

impl From<FollowupResult> for FollowupResponse {
    fn from(result: FollowupResult) -> Self {
        Self {
            followups: result.text,
            questions: result.questions,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub questions: Vec<AskRequest>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Answered {
        question: String,
        subject: String,
        #[serde(flatten)]
        response: AskResponse,
    },
    Failed {
        question: String,
        error: String,
        stage: AnswerStage,
    },
}

impl From<BatchItemResult> for BatchEntry {
    fn from(item: BatchItemResult) -> Self {
        match item {
            BatchItemResult::Answered(result) => Self::Answered {
                question: result.question.clone(),
                subject: result.subject.clone(),
                response: AskResponse::from(result),
            },
            BatchItemResult::Failed {
                question,
                error,
                stage,
            } => Self::Failed {
                question,
                error,
                stage,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub results: Vec<BatchEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub cache_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub total_entries: usize,
    pub cache_file_exists: bool,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            total_entries: stats.total_entries,
            cache_file_exists: stats.cache_file_exists,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
