//! Core trait and types for text oracles.
//!
//! An oracle is anything that turns a system prompt plus a user prompt into
//! free text: a hosted LLM, a scripted test double, or a wrapper adding
//! timeouts. This crate defines:
//!
//! - [`TextOracle`] - The capability every oracle implements
//! - [`OracleError`] - Error types for oracle calls
//! - [`Turn`] / [`Role`] - Conversation turns shared with prompt builders
//! - [`TimeoutOracle`] - Wrapper that bounds every call with a deadline
//! - [`extract_json`] - Lenient extraction of JSON objects from LLM replies
//!
//! # Example
//!
//! ```rust
//! use oracle_core::{async_trait, OracleError, TextOracle};
//!
//! struct Shouting;
//!
//! #[async_trait]
//! impl TextOracle for Shouting {
//!     async fn complete(&self, _system: &str, user: &str) -> Result<String, OracleError> {
//!         Ok(user.to_uppercase())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Shouting"
//!     }
//! }
//! ```

mod error;
mod history;
mod json;
mod oracle;
mod prompt;
mod timeout;

pub use error::OracleError;
pub use history::{render_transcript, Role, Turn};
pub use json::{extract_balanced_json, extract_json};
pub use oracle::{TextOracle, UnconfiguredOracle};
pub use prompt::hash_prompt;
pub use timeout::TimeoutOracle;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
