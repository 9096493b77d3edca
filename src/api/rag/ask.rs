//! Single question endpoint

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, AskRequest, AskResponse, Json};

/// POST /api/ask
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let request = request.into_domain();
    debug!(subject = %request.subject, "Answering question");

    let result = state.answer_service.ask(request).await?;

    Ok(Json(AskResponse::from(result)))
}
