//! Provider adapters against a local mock HTTP server

use serde_json::json;
use tutor_rag::domain::{
    CompletionProvider, CompletionRequest, EmbeddingProvider, FinishReason, IndexQuery,
    VectorIndexProvider,
};
use tutor_rag::infrastructure::embedding::{HttpEmbeddingProvider, OpenAiEmbeddingProvider};
use tutor_rag::infrastructure::http_client::HttpClient;
use tutor_rag::infrastructure::knowledge_base::PineconeIndexProvider;
use tutor_rag::infrastructure::llm::GeminiProvider;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn gemini_generate_content_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "gm-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Question: what is tcp" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "TCP is a " }, { "text": "reliable protocol." }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 5 },
            "modelVersion": "gemini-1.5-flash-002"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        GeminiProvider::with_base_url(HttpClient::new(), "gm-key", server.uri(), "gemini-1.5-flash");
    let response = provider
        .complete(CompletionRequest::new("Question: what is tcp"))
        .await
        .unwrap();

    assert_eq!(response.text, "TCP is a reliable protocol.");
    assert_eq!(response.model, "gemini-1.5-flash-002");
    assert_eq!(response.finish_reason, Some(FinishReason::Stop));
    assert_eq!(response.usage.unwrap().total_tokens, 17);
}

#[tokio::test]
async fn gemini_blocked_prompt_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [],
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let provider = GeminiProvider::with_base_url(HttpClient::new(), "k", server.uri(), "m");
    let err = provider.complete(CompletionRequest::new("p")).await.unwrap_err();

    assert!(err.to_string().contains("SAFETY"));
}

#[tokio::test]
async fn gemini_http_error_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let provider = GeminiProvider::with_base_url(HttpClient::new(), "k", server.uri(), "m");
    let err = provider.complete(CompletionRequest::new("p")).await.unwrap_err();

    assert!(err.to_string().contains("429"));
    assert!(err.is_transient());
}

#[tokio::test]
async fn pinecone_query_sends_namespace_and_parses_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(header("Api-Key", "pc-key"))
        .and(header("X-Pinecone-API-Version", "2024-07"))
        .and(body_partial_json(json!({
            "vector": [0.5, 0.25],
            "topK": 3,
            "namespace": "CN",
            "includeMetadata": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [
                { "id": "cn-2", "score": 0.61, "metadata": { "text": "UDP is connectionless.", "subject": "CN", "chunk_id": 2.0 } },
                { "id": "cn-1", "score": 0.92, "metadata": { "text": "TCP is reliable.", "subject": "CN", "chunk_id": 1.0, "page": 14 } }
            ],
            "namespace": "CN"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = PineconeIndexProvider::new(HttpClient::new(), server.uri(), "pc-key", "2024-07");
    let matches = provider
        .query(IndexQuery::new(vec![0.5, 0.25], 3, "CN"))
        .await
        .unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].id, "cn-1");
    assert_eq!(matches[0].text, "TCP is reliable.");
    assert_eq!(matches[0].chunk_id, Some(1));
    assert_eq!(matches[0].metadata.get("page"), Some(&json!(14)));
    assert_eq!(matches[1].subject.as_deref(), Some("CN"));
}

#[tokio::test]
async fn openai_embeddings_request_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({
            "model": "text-embedding-3-small",
            "input": "what is tcp",
            "dimensions": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "embedding": [0.5, 0.25], "index": 0 }]
        })))
        .mount(&server)
        .await;

    let provider = OpenAiEmbeddingProvider::with_base_url(
        HttpClient::new(),
        Some("sk-test".to_string()),
        server.uri(),
        "text-embedding-3-small",
    )
    .with_dimensions(2);

    assert_eq!(provider.embed("what is tcp").await.unwrap(), vec![0.5, 0.25]);
}

#[tokio::test]
async fn http_embedder_accepts_bare_array() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embed"))
        .and(body_json(json!({ "text": "explain deadlock" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1.0, 0.0, 0.5])))
        .mount(&server)
        .await;

    let url = format!("{}/embed", server.uri());
    let provider = HttpEmbeddingProvider::new(HttpClient::new(), url, "all-MiniLM-L6-v2");

    assert_eq!(
        provider.embed("explain deadlock").await.unwrap(),
        vec![1.0, 0.0, 0.5]
    );
}

#[tokio::test]
async fn http_embedder_server_error_surfaces() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("cold start"))
        .mount(&server)
        .await;

    let provider = HttpEmbeddingProvider::new(HttpClient::new(), server.uri(), "m");

    assert!(provider.embed("x").await.is_err());
}
