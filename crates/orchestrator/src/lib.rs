//! Conversation orchestrator for the architecture assistant.
//!
//! This crate provides the [`Orchestrator`] type, which turns one user
//! message into one reply while keeping a per-user conversation in a
//! [`ConversationStore`].
//!
//! # Features
//!
//! - Classifies intents with the oracle, falling back to regex rules
//! - Extracts requirement levels with keyword rules plus the oracle
//! - Asks for missing parameters, offering early evaluation once
//! - Ranks the architecture catalog and explains the winner
//! - Compares two architectures and answers general questions
//! - Archives conversations and keeps one active conversation per user
//!
//! # Architecture
//!
//! ```text
//! AssistantRequest (HTTP or console)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Validate user id, check the oracle is configured        │
//! │         ↓                                                   │
//! │  2. Take the per-user lock, load or create conversation     │
//! │         ↓                                                   │
//! │  3. Classify intent (oracle → rules fallback)               │
//! │         ↓                                                   │
//! │  4. StateMachine picks the action:                          │
//! │     • evaluate → extract, then ask or score + explain       │
//! │     • compare → extract names, compare two                  │
//! │     • answer → knowledge prompt with history                │
//! │     • archive → close, open a fresh conversation            │
//! │         ↓                                                   │
//! │  5. Append reply, commit through the store                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use database::Database;
//! use groq_oracle::GroqOracle;
//! use orchestrator::{AssistantRequest, Orchestrator, OrchestratorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:archassistant.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let oracle = Arc::new(GroqOracle::from_env()?);
//!     let orchestrator = Orchestrator::new(&OrchestratorConfig::from_env()?, db, oracle)?;
//!
//!     let reply = orchestrator
//!         .process_message(AssistantRequest::new("user-42", "necesito alta escalabilidad"))
//!         .await?;
//!     println!("{}", reply.reply);
//!     Ok(())
//! }
//! ```

mod actions;
mod compare;
mod config;
mod conversation;
mod error;
mod extractor;
mod intent;
mod locks;
mod orchestrator;
pub mod prompts;
mod responder;
mod state;
mod store;

// Public exports
pub use actions::{Action, EvaluationStep};
pub use compare::{parse_names_reply, ArchitectureNameExtractor};
pub use config::OrchestratorConfig;
pub use conversation::Conversation;
pub use error::{
    AssistantError, StoreError, GENERIC_FAILURE_MESSAGE, MISSING_API_CONFIG_MESSAGE,
    MISSING_USER_ID_MESSAGE,
};
pub use extractor::{merge, parse_oracle_params, HybridParamExtractor, MergePolicy};
pub use intent::{
    parse_oracle_label, Intent, IntentClassifier, IntentRules, DEFAULT_INTENT_RULES_JSON,
};
pub use locks::UserLocks;
pub use orchestrator::{AssistantReply, AssistantRequest, Orchestrator};
pub use responder::{
    clarification_reply, comparison_table, evaluation_reply, fallback_question, Responder,
    ANSWER_APOLOGY, ARCHIVE_REPLY, COMPARISON_APOLOGY, EXPLANATION_APOLOGY,
    INSUFFICIENT_INFO_REPLY, SUGGESTION_TEXT,
};
pub use state::{
    ConversationState, StateMachine, DEFAULT_SUGGEST_AFTER_KNOWN, DEFAULT_SUGGEST_AFTER_QUESTIONS,
};
pub use store::ConversationStore;

// Re-export commonly used types from dependencies
pub use catalog::{Catalog, Level, ParamName, ParamSet};
pub use oracle_core::{Role, TextOracle, Turn};
