//! Actions chosen by the state machine.

use catalog::ParamName;
use serde::{Deserialize, Serialize};

/// What the orchestrator does with one user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Extract parameters (unless forced), then ask or score.
    Evaluate {
        /// Score with whatever is known, skipping extraction and questions.
        force: bool,
    },
    /// Begin an evaluation by asking the first question.
    StartEvaluation,
    /// Compare two named architectures.
    Compare,
    /// Answer a general architecture question.
    AnswerQuestion,
    /// Archive the conversation and open a new one.
    Archive,
}

/// Next step of an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationStep {
    /// Enough is known (or the user insisted): rank the catalog.
    Score,
    /// Ask about the missing parameters.
    Ask {
        missing: Vec<ParamName>,
        /// Prefix the question with the early-evaluation hint.
        suggest: bool,
    },
}
