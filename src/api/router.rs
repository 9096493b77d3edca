use axum::{extract::OriginalUri, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::admin;
use super::health;
use super::rag;
use super::state::AppState;
use super::types::ApiError;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let api = rag::create_rag_router()
        .merge(admin::create_admin_router())
        .route("/health", get(health::api_health));

    Router::new()
        // Liveness endpoints (no state needed)
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .nest("/api", api)
        .fallback(route_not_found)
        .with_state(state)
        // Browser clients are served from other origins
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn route_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
