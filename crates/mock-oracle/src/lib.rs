//! Mock oracle implementations for testing.
//!
//! This crate provides deterministic implementations of the `TextOracle`
//! trait:
//! - `ScriptedOracle` - Answers according to substring rules on the system prompt
//! - `FailingOracle` - Always fails with a fixed error
//! - `DelayedOracle` - Wraps another oracle with artificial delay
//!
//! For production use, see the `groq-oracle` crate.
//!
//! # Example
//!
//! ```rust
//! use mock_oracle::{ScriptedOracle, TextOracle};
//!
//! #[tokio::main]
//! async fn main() {
//!     let oracle = ScriptedOracle::new()
//!         .when("classify", "evaluate")
//!         .otherwise("no sé");
//!
//!     let label = oracle.complete("classify the intent", "hola").await.unwrap();
//!     assert_eq!(label, "evaluate");
//! }
//! ```

mod delayed;
mod failing;
mod scripted;

// Re-export oracle-core types for convenience
pub use oracle_core::{async_trait, OracleError, TextOracle};

pub use delayed::DelayedOracle;
pub use failing::FailingOracle;
pub use scripted::{OracleCall, ScriptedOracle};
