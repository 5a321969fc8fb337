//! Timeout wrapper for oracles.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::OracleError;
use crate::oracle::TextOracle;

/// An oracle that wraps another oracle and bounds each call with a deadline.
///
/// A call that outlives the deadline is dropped and reported as
/// [`OracleError::Timeout`], which callers treat like any other oracle
/// failure.
pub struct TimeoutOracle<O: TextOracle> {
    inner: O,
    timeout: Duration,
}

impl<O: TextOracle> TimeoutOracle<O> {
    /// Wrap `inner` so that every call fails after `timeout`.
    pub fn new(inner: O, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// The configured deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<O: TextOracle> TextOracle for TimeoutOracle<O> {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, OracleError> {
        let call = self.inner.complete(system_prompt, user_prompt);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    oracle = self.inner.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "ORACLE_TIMEOUT"
                );
                Err(OracleError::Timeout(self.timeout))
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn is_ready(&self) -> bool {
        self.inner.is_ready().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowOracle {
        delay: Duration,
    }

    #[async_trait]
    impl TextOracle for SlowOracle {
        async fn complete(&self, _system: &str, user: &str) -> Result<String, OracleError> {
            tokio::time::sleep(self.delay).await;
            Ok(user.to_string())
        }

        fn name(&self) -> &str {
            "SlowOracle"
        }
    }

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let oracle = TimeoutOracle::new(
            SlowOracle {
                delay: Duration::from_millis(1),
            },
            Duration::from_secs(5),
        );

        assert_eq!(oracle.complete("sys", "hola").await.unwrap(), "hola");
        assert_eq!(oracle.name(), "SlowOracle");
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let oracle = TimeoutOracle::new(
            SlowOracle {
                delay: Duration::from_secs(5),
            },
            Duration::from_millis(20),
        );

        let err = oracle.complete("sys", "hola").await.unwrap_err();
        assert_eq!(err, OracleError::Timeout(Duration::from_millis(20)));
    }
}
