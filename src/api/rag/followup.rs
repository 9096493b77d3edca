//! Follow-up question suggestions

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, AskRequest, FollowupResponse, Json};

/// POST /api/followup
pub async fn followup(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<FollowupResponse>, ApiError> {
    let result = state.answer_service.followup(request.into_domain()).await?;

    Ok(Json(FollowupResponse::from(result)))
}
