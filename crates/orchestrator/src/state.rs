//! Conversation lifecycle and action selection.

use std::fmt;

use catalog::ParamName;
use serde::{Deserialize, Serialize};

use crate::actions::{Action, EvaluationStep};
use crate::conversation::Conversation;
use crate::intent::Intent;

/// Lifecycle state of a conversation.
///
/// `AwaitingParams`, `ReadyToEvaluate` and `Clarifying` are only read from
/// older rows; new conversations move between `Initial`,
/// `EvaluationStarted` and `Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Initial,
    EvaluationStarted,
    AwaitingParams,
    ReadyToEvaluate,
    Clarifying,
    Completed,
}

impl ConversationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Initial => "initial",
            ConversationState::EvaluationStarted => "evaluation_started",
            ConversationState::AwaitingParams => "awaiting_params",
            ConversationState::ReadyToEvaluate => "ready_to_evaluate",
            ConversationState::Clarifying => "clarifying",
            ConversationState::Completed => "completed",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "initial" => Some(ConversationState::Initial),
            "evaluation_started" => Some(ConversationState::EvaluationStarted),
            "awaiting_params" => Some(ConversationState::AwaitingParams),
            "ready_to_evaluate" => Some(ConversationState::ReadyToEvaluate),
            "clarifying" => Some(ConversationState::Clarifying),
            "completed" => Some(ConversationState::Completed),
            _ => None,
        }
    }

    /// True while parameters are being collected.
    pub fn is_evaluating(&self) -> bool {
        matches!(
            self,
            ConversationState::EvaluationStarted
                | ConversationState::AwaitingParams
                | ConversationState::ReadyToEvaluate
        )
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default number of questions after which early evaluation is offered.
pub const DEFAULT_SUGGEST_AFTER_QUESTIONS: u32 = 3;

/// Default number of known parameters after which early evaluation is offered.
pub const DEFAULT_SUGGEST_AFTER_KNOWN: usize = 3;

/// Pure decision logic of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMachine {
    suggest_after_questions: u32,
    suggest_after_known: usize,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_SUGGEST_AFTER_QUESTIONS, DEFAULT_SUGGEST_AFTER_KNOWN)
    }
}

impl StateMachine {
    pub fn new(suggest_after_questions: u32, suggest_after_known: usize) -> Self {
        Self {
            suggest_after_questions,
            suggest_after_known,
        }
    }

    /// Pick the action for a classified message in the given state.
    pub fn next_action(&self, state: ConversationState, intent: Intent) -> Action {
        match intent {
            Intent::Evaluate => Action::Evaluate { force: false },
            Intent::ForceEvaluate => Action::Evaluate { force: true },
            Intent::Compare => Action::Compare,
            Intent::GeneralQuestion => Action::AnswerQuestion,
            Intent::Archive => Action::Archive,
            Intent::Unclassified if state.is_evaluating() => Action::Evaluate { force: false },
            Intent::Unclassified => Action::StartEvaluation,
        }
    }

    /// Decide whether to score now or keep asking.
    ///
    /// The hint is offered once, after enough questions or enough known
    /// parameters.
    pub fn plan_evaluation(
        &self,
        conversation: &Conversation,
        required: &[ParamName],
        force: bool,
    ) -> EvaluationStep {
        let missing = conversation.params.missing(required);
        if force || missing.is_empty() {
            return EvaluationStep::Score;
        }

        let suggest = !conversation.suggestion_given
            && (conversation.questions_asked >= self.suggest_after_questions
                || conversation.params.len() >= self.suggest_after_known);

        EvaluationStep::Ask { missing, suggest }
    }
}
