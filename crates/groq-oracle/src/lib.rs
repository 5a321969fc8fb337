//! Groq-backed text oracle.
//!
//! This crate provides a [`TextOracle`] that talks to any OpenAI-compatible
//! chat-completions endpoint, Groq by default.
//!
//! # Features
//!
//! - One stateless request per call (system prompt + user prompt)
//! - HTTP client timeout in addition to the caller's own deadline
//! - Configurable via environment variables or a builder
//!
//! # Usage
//!
//! ```rust,no_run
//! use groq_oracle::{GroqOracle, TextOracle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let oracle = GroqOracle::from_env()?;
//!     let reply = oracle
//!         .complete("Answer in one word.", "Best architecture for a blog?")
//!         .await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod oracle;

pub use config::{GroqOracleConfig, GroqOracleConfigBuilder};
pub use oracle::GroqOracle;

// Re-export oracle-core types for convenience
pub use oracle_core::{async_trait, OracleError, TextOracle};
