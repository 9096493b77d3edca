//! Question-answering endpoints

pub mod ask;
pub mod batch;
pub mod followup;

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};

use super::state::AppState;
use super::types::{IndexResponse, Json};

/// Create the question-answering router
pub fn create_rag_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/ask", post(ask::ask))
        .route("/followup", post(followup::followup))
        .route("/batch", post(batch::batch_ask))
}

/// GET /api
pub async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    let stats = state.cache.stats().await;

    Json(IndexResponse {
        message: "Tutor RAG API is running".to_string(),
        cache_size: stats.total_entries,
    })
}
