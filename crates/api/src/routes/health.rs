//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Liveness plus whether the oracle can serve requests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    pub oracle: String,
    pub oracle_ready: bool,
    pub architectures: usize,
}

/// `GET /health`; the status stays "ok" while the oracle is unconfigured.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let orchestrator = &state.orchestrator;
    Json(Health {
        status: "ok",
        oracle: orchestrator.oracle_name().to_string(),
        oracle_ready: orchestrator.oracle_ready().await,
        architectures: orchestrator.catalog().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use mock_oracle::ScriptedOracle;

    use crate::state::test_state;

    #[tokio::test]
    async fn test_reports_unready_oracle() {
        let state = test_state(Arc::new(ScriptedOracle::new().not_ready())).await;

        let Json(health) = health(State(state)).await;
        assert_eq!(health.status, "ok");
        assert!(!health.oracle_ready);
        assert_eq!(health.oracle, "ScriptedOracle");
        assert!(health.architectures > 0);
    }
}
