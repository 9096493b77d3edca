//! Embedding cache administration

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, CacheStatsResponse, Json, MessageResponse};

/// GET /api/cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse::from(state.cache.stats().await))
}

/// POST /api/cache/clear
///
/// Drops every entry and deletes the backing file.
pub async fn clear_cache(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    state.cache.clear().await?;
    info!("Embedding cache cleared");

    Ok(Json(MessageResponse::new("Cache cleared successfully")))
}
