//! HTTP service for the architecture assistant.
//!
//! Exposes the orchestrator as a JSON API.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use database::Database;
use groq_oracle::GroqOracle;
use oracle_core::{TextOracle, UnconfiguredOracle};
use orchestrator::{Orchestrator, OrchestratorConfig};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let orchestrator_config = OrchestratorConfig::from_env()?;
    info!(addr = %config.addr, "Starting assistant API");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Requests get a configuration error until the oracle is set up.
    let oracle: Arc<dyn TextOracle> = match GroqOracle::from_env() {
        Ok(oracle) => Arc::new(oracle),
        Err(e) => {
            warn!(error = %e, "Groq oracle not configured");
            Arc::new(UnconfiguredOracle::new(e.to_string()))
        }
    };

    let orchestrator = Orchestrator::new(&orchestrator_config, db, oracle)?;
    let state = AppState::new(orchestrator);

    // Build router
    let app = routes::router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Assistant API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
