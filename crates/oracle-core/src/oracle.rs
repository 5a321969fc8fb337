//! The TextOracle trait definition.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::OracleError;

/// A single-shot text completion capability.
///
/// Every LLM-backed feature of the assistant (classification, extraction,
/// explanation, follow-up questions, knowledge answers, comparisons) goes
/// through this one method. The trait is object-safe and is normally held
/// as `Arc<dyn TextOracle>`.
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Complete `user_prompt` under the instructions in `system_prompt`.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OracleError>;

    /// Get a human-readable name for this oracle implementation.
    fn name(&self) -> &str;

    /// Check if the oracle is configured and able to serve requests.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}

#[async_trait]
impl<T: TextOracle + ?Sized> TextOracle for Arc<T> {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, OracleError> {
        (**self).complete(system_prompt, user_prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    async fn is_ready(&self) -> bool {
        (**self).is_ready().await
    }
}

/// Placeholder oracle used when no credentials are available.
///
/// It reports itself as not ready so request handlers can reject work
/// with a configuration error instead of silently degrading.
#[derive(Debug, Clone)]
pub struct UnconfiguredOracle {
    reason: String,
}

impl UnconfiguredOracle {
    /// Create an unconfigured oracle carrying the reason it is unusable.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why this oracle is unusable.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl TextOracle for UnconfiguredOracle {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, OracleError> {
        Err(OracleError::Configuration(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "UnconfiguredOracle"
    }

    async fn is_ready(&self) -> bool {
        false
    }
}
