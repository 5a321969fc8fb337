//! Orchestrator configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use catalog::MatchMode;

use crate::error::AssistantError;
use crate::extractor::MergePolicy;
use crate::state::{DEFAULT_SUGGEST_AFTER_KNOWN, DEFAULT_SUGGEST_AFTER_QUESTIONS};

/// Tunables and data-file locations for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Architecture catalog file; the embedded catalog when unset.
    pub catalog_path: Option<PathBuf>,

    /// Parameter keyword rules file; the embedded table when unset.
    pub param_rules_path: Option<PathBuf>,

    /// Intent rules file; the embedded table when unset.
    pub intent_rules_path: Option<PathBuf>,

    /// Deadline for every oracle call.
    pub oracle_timeout: Duration,

    /// Offer early evaluation after this many questions.
    pub suggest_after_questions: u32,

    /// Offer early evaluation once this many parameters are known.
    pub suggest_after_known: usize,

    pub merge_policy: MergePolicy,

    pub match_mode: MatchMode,

    /// Turns of history included in question and knowledge prompts.
    pub transcript_turns: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            param_rules_path: None,
            intent_rules_path: None,
            oracle_timeout: Duration::from_secs(30),
            suggest_after_questions: DEFAULT_SUGGEST_AFTER_QUESTIONS,
            suggest_after_known: DEFAULT_SUGGEST_AFTER_KNOWN,
            merge_policy: MergePolicy::default(),
            match_mode: MatchMode::default(),
            transcript_turns: 10,
        }
    }
}

impl OrchestratorConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `ARCH_CATALOG_PATH` - Architecture catalog JSON
    /// - `ARCH_PARAM_RULES_PATH` - Parameter keyword rules JSON
    /// - `ARCH_INTENT_RULES_PATH` - Intent rules JSON
    /// - `ARCH_ORACLE_TIMEOUT_SECS` - Oracle deadline (default: 30)
    /// - `ARCH_SUGGEST_AFTER_QUESTIONS` - (default: 3)
    /// - `ARCH_SUGGEST_AFTER_KNOWN` - (default: 3)
    /// - `ARCH_MERGE_POLICY` - `llm_overrides` or `average`
    /// - `ARCH_MATCH_MODE` - `whole_word` or `substring`
    /// - `ARCH_TRANSCRIPT_TURNS` - (default: 10)
    pub fn from_env() -> Result<Self, AssistantError> {
        let defaults = Self::default();

        let merge_policy = match non_empty_var("ARCH_MERGE_POLICY") {
            Some(label) => MergePolicy::from_label(&label).ok_or_else(|| {
                AssistantError::Configuration(format!("invalid ARCH_MERGE_POLICY: {}", label))
            })?,
            None => defaults.merge_policy,
        };

        let match_mode = match non_empty_var("ARCH_MATCH_MODE") {
            Some(label) => MatchMode::from_label(&label).ok_or_else(|| {
                AssistantError::Configuration(format!("invalid ARCH_MATCH_MODE: {}", label))
            })?,
            None => defaults.match_mode,
        };

        Ok(Self {
            catalog_path: non_empty_var("ARCH_CATALOG_PATH").map(PathBuf::from),
            param_rules_path: non_empty_var("ARCH_PARAM_RULES_PATH").map(PathBuf::from),
            intent_rules_path: non_empty_var("ARCH_INTENT_RULES_PATH").map(PathBuf::from),
            oracle_timeout: parsed_var("ARCH_ORACLE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.oracle_timeout),
            suggest_after_questions: parsed_var("ARCH_SUGGEST_AFTER_QUESTIONS")
                .unwrap_or(defaults.suggest_after_questions),
            suggest_after_known: parsed_var("ARCH_SUGGEST_AFTER_KNOWN")
                .unwrap_or(defaults.suggest_after_known),
            merge_policy,
            match_mode,
            transcript_turns: parsed_var("ARCH_TRANSCRIPT_TURNS")
                .unwrap_or(defaults.transcript_turns),
        })
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn with_suggestion_thresholds(mut self, questions: u32, known: usize) -> Self {
        self.suggest_after_questions = questions;
        self.suggest_after_known = known;
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    non_empty_var(name).and_then(|v| v.trim().parse().ok())
}
