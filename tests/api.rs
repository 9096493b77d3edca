//! HTTP surface driven end to end with in-process providers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use tutor_rag::api::{create_router, AppState};
use tutor_rag::domain::{
    CompletionProvider, CompletionRequest, CompletionResponse, ContextSelectionConfig,
    ContextSelector, DomainError, EmbeddingCache, EmbeddingProvider, IndexQuery, PromptBuilder,
    RetrievalMatch, VectorIndexProvider,
};
use tutor_rag::infrastructure::cache::JsonFileEmbeddingCache;
use tutor_rag::infrastructure::services::{
    AnswerService, AnswerServiceConfig, EmbeddingService, EmbeddingServiceConfig,
};

const DIMS: usize = 3;

#[derive(Debug, Default)]
struct CountingEmbedder {
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![1.0, text.len() as f32, 0.0])
    }

    fn provider_name(&self) -> &'static str {
        "counting"
    }

    fn model(&self) -> &str {
        "test-embedder"
    }
}

#[derive(Debug, Default)]
struct SubjectIndex {
    queries: AtomicUsize,
}

#[async_trait]
impl VectorIndexProvider for SubjectIndex {
    fn provider_type(&self) -> &'static str {
        "subject"
    }

    async fn query(&self, query: IndexQuery) -> Result<Vec<RetrievalMatch>, DomainError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        Ok(vec![
            RetrievalMatch::new("a", format!("{} chapter one", query.namespace), 0.9)
                .with_subject(query.namespace.clone())
                .with_chunk_id(1),
            RetrievalMatch::new("b", "unrelated appendix", 0.3),
        ])
    }
}

/// Answers with the prompt's question line; refuses anything about deadlock
#[derive(Debug, Default)]
struct EchoCompletion {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionProvider for EchoCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if request.prompt.contains("deadlock") {
            return Err(DomainError::provider("echo", "quota exceeded"));
        }

        if request.prompt.contains("Student asked") {
            return Ok(CompletionResponse::new(
                "echo-1",
                "1. What is a three-way handshake?\n2. How does TCP recover lost segments?",
            ));
        }

        let question = request
            .prompt
            .lines()
            .find_map(|line| line.strip_prefix("Question: "))
            .unwrap_or_default();

        Ok(CompletionResponse::new("echo-1", format!("Answer about {}", question)))
    }

    fn provider_name(&self) -> &'static str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo-1"
    }
}

struct Harness {
    router: Router,
    embedder: Arc<CountingEmbedder>,
    index: Arc<SubjectIndex>,
    completion: Arc<EchoCompletion>,
    cache: Arc<JsonFileEmbeddingCache>,
}

fn harness() -> Harness {
    let path = std::env::temp_dir().join(format!("api-test-{}.json", uuid::Uuid::new_v4()));
    let cache = Arc::new(JsonFileEmbeddingCache::new(path));
    let embedder = Arc::new(CountingEmbedder::default());
    let index = Arc::new(SubjectIndex::default());
    let completion = Arc::new(EchoCompletion::default());

    let embeddings = EmbeddingService::new(
        embedder.clone(),
        cache.clone(),
        EmbeddingServiceConfig {
            dimensions: DIMS,
            persist_every: 100,
            ..Default::default()
        },
    );

    let answers = AnswerService::new(
        embeddings,
        index.clone(),
        completion.clone(),
        ContextSelector::new(ContextSelectionConfig::default()),
        PromptBuilder::default(),
        AnswerServiceConfig::default(),
    );

    let state = AppState::new(Arc::new(answers), cache.clone());

    Harness {
        router: create_router(state),
        embedder,
        index,
        completion,
        cache,
    }
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

#[tokio::test]
async fn ask_returns_answer_with_sources_and_timing() {
    let h = harness();

    let (status, body) = send(
        &h.router,
        post_json("/api/ask", json!({ "subject": "CN", "question": "what is tcp" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Answer about what is tcp");
    assert_eq!(body["cached"], false);
    assert!(body["response_time"].as_str().unwrap().ends_with('s'));
    assert!(body["timing"]["total_ms"].is_u64());

    // Only the 0.9 match clears the threshold
    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["text"], "CN chapter one");
}

#[tokio::test]
async fn repeated_question_hits_embedding_cache() {
    let h = harness();
    let body = json!({ "subject": "OS", "question": "what is paging" });

    send(&h.router, post_json("/api/ask", body.clone())).await;
    let (status, second) = send(&h.router, post_json("/api/ask", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["cached"], true);
    assert_eq!(h.embedder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.cache.stats().await.total_entries, 1);
}

#[tokio::test]
async fn missing_question_is_rejected_before_any_call() {
    let h = harness();

    let (status, body) = send(&h.router, post_json("/api/ask", json!({ "subject": "CN" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert_eq!(body["error"]["code"], "validate");
    assert_eq!(h.embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.index.queries.load(Ordering::SeqCst), 0);
    assert_eq!(h.completion.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn completion_failure_maps_to_service_unavailable() {
    let h = harness();

    let (status, body) = send(
        &h.router,
        post_json("/api/ask", json!({ "subject": "OS", "question": "explain deadlock" })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "complete");
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let h = harness();

    let request = Request::builder()
        .method("POST")
        .uri("/api/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"subject\": "))
        .unwrap();
    let (status, body) = send(&h.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "json_parse_error");
}

#[tokio::test]
async fn batch_keeps_order_and_isolates_failures() {
    let h = harness();

    let (status, body) = send(
        &h.router,
        post_json(
            "/api/batch",
            json!({
                "questions": [
                    { "subject": "CN", "question": "what is tcp" },
                    { "subject": "OS", "question": "explain deadlock" },
                    { "subject": "DBMS", "question": "what is normalization" }
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["question"], "what is tcp");
    assert_eq!(results[0]["subject"], "CN");
    assert_eq!(results[0]["answer"], "Answer about what is tcp");

    assert_eq!(results[1]["question"], "explain deadlock");
    assert_eq!(results[1]["stage"], "COMPLETE");
    assert!(results[1]["error"].as_str().unwrap().contains("quota exceeded"));
    assert!(results[1].get("answer").is_none());

    assert_eq!(results[2]["question"], "what is normalization");
    assert_eq!(results[2]["subject"], "DBMS");
    assert_eq!(results[2]["answer"], "Answer about what is normalization");
}

#[tokio::test]
async fn followup_returns_two_questions() {
    let h = harness();

    let (status, body) = send(
        &h.router,
        post_json("/api/followup", json!({ "subject": "CN", "question": "what is tcp" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["questions"],
        json!([
            "What is a three-way handshake?",
            "How does TCP recover lost segments?"
        ])
    );
    assert!(body["followups"].as_str().unwrap().starts_with("1."));
}

#[tokio::test]
async fn cache_stats_and_clear() {
    let h = harness();

    send(
        &h.router,
        post_json("/api/ask", json!({ "subject": "CN", "question": "how does dns work" })),
    )
    .await;

    let (status, stats) = send(&h.router, get("/api/cache/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_entries"], 1);

    let (status, cleared) = send(
        &h.router,
        Request::builder()
            .method("POST")
            .uri("/api/cache/clear")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["message"], "Cache cleared successfully");

    let (_, stats) = send(&h.router, get("/api/cache/stats")).await;
    assert_eq!(stats["total_entries"], 0);
    assert_eq!(stats["cache_file_exists"], false);
}

#[tokio::test]
async fn health_endpoints() {
    let h = harness();

    let (status, body) = send(&h.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&h.router, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cache_size"], 0);

    let (status, _) = send(&h.router, get("/live")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&h.router, get("/api")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Tutor RAG API is running");
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
    let h = harness();

    let (status, body) = send(&h.router, get("/api/unknown")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found_error");
    assert_eq!(body["error"]["message"], "No route for /api/unknown");
}
