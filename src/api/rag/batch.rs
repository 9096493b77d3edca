//! Batch question endpoint

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{BatchEntry, BatchRequest, BatchResponse, Json};

/// POST /api/batch
///
/// Always answers 200 with one entry per input; per-item failures are
/// reported inline.
pub async fn batch_ask(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Json<BatchResponse> {
    debug!(items = request.questions.len(), "Answering batch");

    let requests = request
        .questions
        .into_iter()
        .map(|item| item.into_domain())
        .collect();

    let results = state
        .answer_service
        .batch_ask(requests)
        .await
        .into_iter()
        .map(BatchEntry::from)
        .collect();

    Json(BatchResponse { results })
}
