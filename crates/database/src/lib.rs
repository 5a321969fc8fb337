//! SQLite persistence layer for the architecture assistant.
//!
//! This crate provides async database operations for conversations using
//! SQLx with SQLite. Rows carry JSON text for parameters and history; the
//! orchestrator owns their interpretation.
//!
//! # Example
//!
//! ```no_run
//! use database::{conversation, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:archassistant.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Start a conversation for a user
//!     let record = conversation::create_conversation(
//!         db.pool(),
//!         "7d1b0a8e-3c55-4c1e-9b0e-1f2a3b4c5d6e",
//!         "user-42",
//!     )
//!     .await?;
//!     assert!(record.is_active);
//!
//!     Ok(())
//! }
//! ```

pub mod conversation;
pub mod error;
pub mod models;

pub use error::{DatabaseError, Result};
pub use models::ConversationRecord;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Shared handle to the conversation database.
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Writers wait this long for a lock before failing.
    const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

    /// Open `url` with the default pool size.
    ///
    /// File URLs look like `sqlite:archassistant.db?mode=rwc`; `mode=rwc`
    /// creates the file. `sqlite::memory:` gives a fresh in-memory
    /// database, which tests usually open with a pool size of 1.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .busy_timeout(Self::BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!(url, pool_size, "DATABASE_CONNECTED");
        Ok(Self { pool })
    }

    /// Apply the embedded migrations; safe to call on every start.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("DATABASE_MIGRATED");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
