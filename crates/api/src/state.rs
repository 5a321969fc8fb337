//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use orchestrator::Orchestrator;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator<Database>>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator<Database>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_state(oracle: Arc<dyn orchestrator::TextOracle>) -> AppState {
    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();

    let config = orchestrator::OrchestratorConfig::default();
    AppState::new(Orchestrator::new(&config, db, oracle).unwrap())
}
