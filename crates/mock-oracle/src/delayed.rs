//! Delayed oracle implementation - wraps another oracle with artificial delay.

use std::time::Duration;

use oracle_core::{async_trait, OracleError, TextOracle};
use tokio::time::sleep;

/// An oracle that wraps another oracle and adds artificial delay.
///
/// Useful for testing timeout handling and simulating LLM latency.
pub struct DelayedOracle<O: TextOracle> {
    inner: O,
    delay: Duration,
}

impl<O: TextOracle> DelayedOracle<O> {
    /// Create a new DelayedOracle wrapping the given oracle with the specified delay.
    pub fn new(inner: O, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create an oracle with a delay in milliseconds.
    pub fn with_millis(inner: O, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Create an oracle with a delay in seconds.
    pub fn with_secs(inner: O, secs: u64) -> Self {
        Self::new(inner, Duration::from_secs(secs))
    }
}

#[async_trait]
impl<O: TextOracle> TextOracle for DelayedOracle<O> {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, OracleError> {
        sleep(self.delay).await;
        self.inner.complete(system_prompt, user_prompt).await
    }

    fn name(&self) -> &str {
        "DelayedOracle"
    }

    async fn is_ready(&self) -> bool {
        self.inner.is_ready().await
    }
}
