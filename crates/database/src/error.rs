//! Database error types.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Record already exists
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// A second active conversation was about to be stored for a user.
    #[error("user {user_id} already has an active conversation")]
    ActiveConflict { user_id: String },
}

impl DatabaseError {
    /// Translate a unique-constraint failure on the conversations table.
    pub(crate) fn from_conversation_write(err: sqlx::Error, id: &str, user_id: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                if db_err.message().contains("conversations.id") {
                    return DatabaseError::AlreadyExists {
                        entity: "conversation",
                        id: id.to_string(),
                    };
                }
                return DatabaseError::ActiveConflict {
                    user_id: user_id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
