//! Error types for orchestrator operations.

use catalog::CatalogError;
use database::DatabaseError;
use thiserror::Error;

/// Errors raised by a [`ConversationStore`](crate::ConversationStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected or failed the operation.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// A stored field could not be interpreted.
    #[error("corrupt {field} in conversation {id}: {reason}")]
    Corrupt {
        id: String,
        field: &'static str,
        reason: String,
    },

    /// The store is unavailable for another reason.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can surface from [`Orchestrator`](crate::Orchestrator).
///
/// Oracle failures never appear here: they are recovered locally.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The request is malformed (for example, no user id).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The LLM oracle is not configured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Loading or saving a conversation failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// A static table could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Message shown when the user id is missing.
pub const MISSING_USER_ID_MESSAGE: &str = "Falta el ID de usuario.";

/// Message shown when the oracle is not configured.
pub const MISSING_API_CONFIG_MESSAGE: &str = "Faltan configuraciones de API";

/// Message shown for every other failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Error al procesar la solicitud.";

impl AssistantError {
    /// The only text about this error that may reach an end user.
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::Validation(msg) => msg.clone(),
            AssistantError::Configuration(_) => MISSING_API_CONFIG_MESSAGE.to_string(),
            AssistantError::Persistence(_) | AssistantError::Catalog(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_hide_internals() {
        let err = AssistantError::Persistence(StoreError::Unavailable("disk full".to_string()));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err = AssistantError::Configuration("GROQ_API_KEY not set".to_string());
        assert_eq!(err.user_message(), MISSING_API_CONFIG_MESSAGE);

        let err = AssistantError::Validation(MISSING_USER_ID_MESSAGE.to_string());
        assert_eq!(err.user_message(), MISSING_USER_ID_MESSAGE);
    }
}
