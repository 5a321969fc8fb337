//! Conversation history endpoint.

use axum::extract::{Path, State};
use axum::Json;
use orchestrator::Conversation;

use crate::error::Result;
use crate::state::AppState;

/// Every conversation of a user, most recently updated first.
pub async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Conversation>>> {
    let conversations = state.orchestrator.history(&user_id).await?;
    Ok(Json(conversations))
}
