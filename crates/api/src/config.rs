//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ASSISTANT_ADDR` | Server bind address | `127.0.0.1:3000` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:archassistant.db?mode=rwc` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("ASSISTANT_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:archassistant.db?mode=rwc".to_string());

        Ok(Self { addr, database_url })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ASSISTANT_ADDR format")]
    InvalidAddr,
}
