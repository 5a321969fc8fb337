//! Error types for oracle calls.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while asking an oracle for text.
///
/// None of these ever reach an end user: callers recover with a local
/// fallback or a canned reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// Credentials or endpoint settings are missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not be delivered.
    #[error("network error: {0}")]
    Network(String),

    /// The remote service answered with an error status.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The reply could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// No reply arrived before the deadline.
    #[error("oracle timed out after {0:?}")]
    Timeout(Duration),

    /// The oracle is temporarily unavailable.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}
