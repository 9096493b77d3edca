//! Retrieval-augmented answer pipeline
//!
//! Each request moves through EMBED, QUERY_INDEX, SELECT_CONTEXT,
//! BUILD_PROMPT and COMPLETE in order. A failing stage ends that request
//! with an [`AnswerFailure`]; batch siblings are unaffected.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

use super::EmbeddingService;
use crate::domain::answer::millis;
use crate::domain::{
    parse_followups, AnswerFailure, AnswerRequest, AnswerResult, AnswerStage, AnswerTiming,
    BatchItemResult, CompletionProvider, CompletionRequest, CompletionResponse, ContextSelector,
    DomainError, FollowupResult, GenerationConfig, IndexQuery, PromptBuilder, RetrievalMatch,
    VectorIndexProvider,
};

/// Configuration for the answer pipeline
#[derive(Debug, Clone)]
pub struct AnswerServiceConfig {
    /// Matches requested from the index when the request does not say
    pub default_top_k: u32,
    /// Batch items in flight at once
    pub max_concurrency: usize,
    pub index_timeout: Duration,
    pub completion_timeout: Duration,
    pub generation: GenerationConfig,
}

impl Default for AnswerServiceConfig {
    fn default() -> Self {
        Self {
            default_top_k: 4,
            max_concurrency: 4,
            index_timeout: Duration::from_secs(10),
            completion_timeout: Duration::from_secs(30),
            generation: GenerationConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnswerService {
    embeddings: EmbeddingService,
    index: Arc<dyn VectorIndexProvider>,
    completion: Arc<dyn CompletionProvider>,
    selector: ContextSelector,
    prompts: PromptBuilder,
    config: AnswerServiceConfig,
}

impl AnswerService {
    pub fn new(
        embeddings: EmbeddingService,
        index: Arc<dyn VectorIndexProvider>,
        completion: Arc<dyn CompletionProvider>,
        selector: ContextSelector,
        prompts: PromptBuilder,
        config: AnswerServiceConfig,
    ) -> Self {
        Self {
            embeddings,
            index,
            completion,
            selector,
            prompts,
            config,
        }
    }

    /// Answer one question against its subject namespace
    #[instrument(skip(self, request), fields(subject = %request.subject))]
    pub async fn ask(&self, request: AnswerRequest) -> Result<AnswerResult, AnswerFailure> {
        let started = Instant::now();
        request
            .validate()
            .map_err(|e| AnswerFailure::new(AnswerStage::Validate, e))?;

        let embed_started = Instant::now();
        let embedded = self.embeddings.embed_question(&request.question).await;
        let embed_ms = millis(embed_started.elapsed());
        let cache_hit = embedded.is_cache_hit();
        let embedding_fallback = embedded.is_fallback();

        let query_started = Instant::now();
        let top_k = request.top_k.unwrap_or(self.config.default_top_k);
        let matches = self
            .query_index(IndexQuery::new(embedded.into_vector(), top_k, &request.subject))
            .await
            .map_err(|e| AnswerFailure::new(AnswerStage::QueryIndex, e))?;
        let query_ms = millis(query_started.elapsed());

        let context = self.selector.build(&matches);
        if context.fell_back {
            info!(matches = matches.len(), "No match above threshold, using top matches");
        }

        let prompt = self
            .prompts
            .answer_prompt(&context.text, &request.question)
            .map_err(|e| AnswerFailure::new(AnswerStage::BuildPrompt, e))?;

        let completion_started = Instant::now();
        let response = self
            .complete(prompt)
            .await
            .map_err(|e| AnswerFailure::new(AnswerStage::Complete, e))?;
        let completion_ms = millis(completion_started.elapsed());

        let timing = AnswerTiming {
            embed_ms,
            query_ms,
            completion_ms,
            total_ms: millis(started.elapsed()),
        };

        info!(
            embed_ms = timing.embed_ms,
            query_ms = timing.query_ms,
            completion_ms = timing.completion_ms,
            total_ms = timing.total_ms,
            cache_hit,
            chunks = context.chunks.len(),
            "Answered question"
        );

        Ok(AnswerResult {
            question: request.question,
            subject: request.subject,
            answer: response.text,
            model: response.model,
            timing,
            cache_hit,
            embedding_fallback,
            context: context.chunks,
            context_fell_back: context.fell_back,
            context_truncated: context.truncated,
        })
    }

    /// Suggest two follow-up questions; retrieved context is never used
    #[instrument(skip(self, request), fields(subject = %request.subject))]
    pub async fn followup(&self, request: AnswerRequest) -> Result<FollowupResult, AnswerFailure> {
        request
            .validate()
            .map_err(|e| AnswerFailure::new(AnswerStage::Validate, e))?;

        let prompt = self
            .prompts
            .followup_prompt(&request.question)
            .map_err(|e| AnswerFailure::new(AnswerStage::BuildPrompt, e))?;

        let started = Instant::now();
        let response = self
            .complete(prompt)
            .await
            .map_err(|e| AnswerFailure::new(AnswerStage::Complete, e))?;
        let completion_ms = millis(started.elapsed());

        let questions = parse_followups(&response.text);
        if questions.len() != 2 {
            warn!(parsed = questions.len(), "Follow-up reply did not contain two numbered items");
        }

        Ok(FollowupResult {
            question: request.question,
            subject: request.subject,
            text: response.text,
            questions,
            completion_ms,
        })
    }

    /// Answer many questions with bounded concurrency.
    ///
    /// Results come back in input order, one per request; failures become
    /// error entries carrying the original question.
    #[instrument(skip(self, requests), fields(items = requests.len()))]
    pub async fn batch_ask(&self, requests: Vec<AnswerRequest>) -> Vec<BatchItemResult> {
        let started = Instant::now();

        let results: Vec<BatchItemResult> = stream::iter(requests)
            .map(|request| self.batch_item(request))
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        info!(
            items = results.len(),
            failed,
            total_ms = millis(started.elapsed()),
            "Batch completed"
        );

        results
    }

    fn batch_item(&self, request: AnswerRequest) -> impl Future<Output = BatchItemResult> + '_ {
        async move {
            let question = request.question.clone();

            match self.ask(request).await {
                Ok(result) => BatchItemResult::Answered(result),
                Err(failure) => {
                    warn!(
                        stage = %failure.stage,
                        transient = failure.error.is_transient(),
                        error = %failure,
                        "Batch item failed"
                    );
                    BatchItemResult::failed(question, &failure)
                }
            }
        }
    }

    async fn query_index(&self, query: IndexQuery) -> Result<Vec<RetrievalMatch>, DomainError> {
        tokio::time::timeout(self.config.index_timeout, self.index.query(query))
            .await
            .map_err(|_| DomainError::timeout("index query", self.config.index_timeout))?
    }

    async fn complete(&self, prompt: String) -> Result<CompletionResponse, DomainError> {
        let request = CompletionRequest::new(prompt).with_generation(self.config.generation.clone());

        tokio::time::timeout(self.config.completion_timeout, self.completion.complete(request))
            .await
            .map_err(|_| DomainError::timeout("completion", self.config.completion_timeout))?
    }
}
