//! The conversation endpoint.

use axum::extract::State;
use axum::Json;
use orchestrator::{AssistantReply, AssistantRequest};
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Process one user message.
///
/// `POST /assistant` with `{message, userId, conversationId?}`.
pub async fn assistant(
    State(state): State<AppState>,
    Json(request): Json<AssistantRequest>,
) -> Result<Json<AssistantReply>> {
    info!(
        user_id = request.user_id.as_deref().unwrap_or(""),
        conversation_id = request.conversation_id.as_deref().unwrap_or(""),
        "ASSISTANT_REQUEST"
    );

    let reply = state.orchestrator.process_message(request).await?;
    Ok(Json(reply))
}
