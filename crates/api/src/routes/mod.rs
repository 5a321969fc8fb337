//! Route handlers for the assistant API.

pub mod assistant;
pub mod health;
pub mod history;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assistant", post(assistant::assistant))
        .route("/assistant/history/:user_id", get(history::history))
        // Health check
        .route("/health", get(health::health))
}
