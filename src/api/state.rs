//! Application state for shared services

use std::sync::Arc;

use crate::domain::{
    AnswerFailure, AnswerRequest, AnswerResult, BatchItemResult, EmbeddingCache, FollowupResult,
};
use crate::infrastructure::services::AnswerService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub answer_service: Arc<dyn AnswerServiceTrait>,
    pub cache: Arc<dyn EmbeddingCache>,
}

impl AppState {
    pub fn new(answer_service: Arc<dyn AnswerServiceTrait>, cache: Arc<dyn EmbeddingCache>) -> Self {
        Self {
            answer_service,
            cache,
        }
    }
}

/// Trait for question-answering operations
#[async_trait::async_trait]
pub trait AnswerServiceTrait: Send + Sync {
    async fn ask(&self, request: AnswerRequest) -> Result<AnswerResult, AnswerFailure>;
    async fn followup(&self, request: AnswerRequest) -> Result<FollowupResult, AnswerFailure>;
    async fn batch_ask(&self, requests: Vec<AnswerRequest>) -> Vec<BatchItemResult>;
}

#[async_trait::async_trait]
impl AnswerServiceTrait for AnswerService {
    async fn ask(&self, request: AnswerRequest) -> Result<AnswerResult, AnswerFailure> {
        AnswerService::ask(self, request).await
    }

    async fn followup(&self, request: AnswerRequest) -> Result<FollowupResult, AnswerFailure> {
        AnswerService::followup(self, request).await
    }

    async fn batch_ask(&self, requests: Vec<AnswerRequest>) -> Vec<BatchItemResult> {
        AnswerService::batch_ask(self, requests).await
    }
}
