//! Failing oracle implementation - every call returns the same error.

use oracle_core::{async_trait, OracleError, TextOracle};

/// An oracle that always fails.
///
/// Useful for exercising the local fallbacks of classification, extraction
/// and reply generation.
#[derive(Debug, Clone)]
pub struct FailingOracle {
    error: OracleError,
}

impl FailingOracle {
    /// Create an oracle that fails with the given error.
    pub fn new(error: OracleError) -> Self {
        Self { error }
    }

    /// Create an oracle that reports itself unavailable.
    pub fn unavailable() -> Self {
        Self::new(OracleError::Unavailable("service down".to_string()))
    }
}

impl Default for FailingOracle {
    fn default() -> Self {
        Self::unavailable()
    }
}

#[async_trait]
impl TextOracle for FailingOracle {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, OracleError> {
        Err(self.error.clone())
    }

    fn name(&self) -> &str {
        "FailingOracle"
    }
}
