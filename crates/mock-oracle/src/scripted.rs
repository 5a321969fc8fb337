//! Scripted oracle implementation - answers by matching the system prompt.

use oracle_core::{async_trait, OracleError, TextOracle};
use tokio::sync::Mutex;

/// A recorded call to a [`ScriptedOracle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleCall {
    pub system_prompt: String,
    pub user_prompt: String,
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(OracleError),
}

/// An oracle that replies from a script.
///
/// Rules are checked in insertion order; the first rule whose needle occurs
/// in the system prompt decides the reply. Calls that match no rule get the
/// fallback reply, which fails by default. Every call is recorded.
pub struct ScriptedOracle {
    rules: Vec<(String, Reply)>,
    fallback: Reply,
    ready: bool,
    calls: Mutex<Vec<OracleCall>>,
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedOracle {
    /// Create an oracle with no rules whose fallback is a failure.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Reply::Fail(OracleError::Unavailable("no scripted reply".to_string())),
            ready: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `reply` when the system prompt contains `needle`.
    pub fn when(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push((needle.into(), Reply::Text(reply.into())));
        self
    }

    /// Fail with `error` when the system prompt contains `needle`.
    pub fn when_fails(mut self, needle: impl Into<String>, error: OracleError) -> Self {
        self.rules.push((needle.into(), Reply::Fail(error)));
        self
    }

    /// Reply with `reply` when no rule matches.
    pub fn otherwise(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Reply::Text(reply.into());
        self
    }

    /// Report the oracle as not ready.
    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    /// All calls received so far, oldest first.
    pub async fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    fn reply_for(&self, system_prompt: &str) -> Reply {
        self.rules
            .iter()
            .find(|(needle, _)| system_prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl TextOracle for ScriptedOracle {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, OracleError> {
        self.calls.lock().await.push(OracleCall {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
        });

        match self.reply_for(system_prompt) {
            Reply::Text(text) => Ok(text),
            Reply::Fail(err) => Err(err),
        }
    }

    fn name(&self) -> &str {
        "ScriptedOracle"
    }

    async fn is_ready(&self) -> bool {
        self.ready
    }
}
