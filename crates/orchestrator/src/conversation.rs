//! The conversation aggregate.

use catalog::ParamSet;
use oracle_core::Turn;
use serde::{Deserialize, Serialize};

use crate::intent::Intent;
use crate::state::ConversationState;

/// One dialogue between a user and the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    /// Known parameters; unknown ones are absent.
    pub params: ParamSet,
    /// Append-only turns, oldest first.
    pub history: Vec<Turn>,
    pub state: ConversationState,
    /// Intent of the most recent user message.
    pub intent: Option<Intent>,
    pub questions_asked: u32,
    pub is_active: bool,
    /// Whether the early-evaluation hint was already shown.
    pub suggestion_given: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Conversation {
    /// A fresh, active conversation with no history.
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            params: ParamSet::new(),
            history: Vec::new(),
            state: ConversationState::Initial,
            intent: None,
            questions_asked: 0,
            is_active: true,
            suggestion_given: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// Merge newly extracted parameters.
    ///
    /// Incoming known values overwrite; parameters missing from `incoming`
    /// keep what the conversation already knew.
    pub fn update_params(&mut self, incoming: &ParamSet) {
        self.params.merge_known(incoming);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(Turn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(Turn::assistant(content));
    }

    pub fn archive(&mut self) {
        self.is_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{Level, ParamName};
    use oracle_core::Role;

    #[test]
    fn test_new_conversation_defaults() {
        let conversation = Conversation::new("c-1", "alice");

        assert_eq!(conversation.state, ConversationState::Initial);
        assert!(conversation.params.is_empty());
        assert!(conversation.history.is_empty());
        assert!(conversation.is_active);
        assert!(!conversation.suggestion_given);
        assert_eq!(conversation.questions_asked, 0);
    }

    #[test]
    fn test_update_params_is_monotonic() {
        let mut conversation = Conversation::new("c-1", "alice");
        conversation.update_params(&[(ParamName::Cost, Level::Low)].into_iter().collect());
        conversation.update_params(&[(ParamName::Security, Level::High)].into_iter().collect());
        conversation.update_params(&ParamSet::new());

        assert_eq!(conversation.params.get(ParamName::Cost), Some(Level::Low));
        assert_eq!(conversation.params.get(ParamName::Security), Some(Level::High));
    }

    #[test]
    fn test_history_is_append_only() {
        let mut conversation = Conversation::new("c-1", "alice");
        conversation.push_user("hola");
        conversation.push_assistant("¿en qué te ayudo?");

        assert_eq!(conversation.history.len(), 2);
        assert_eq!(conversation.history[0].role, Role::User);
        assert_eq!(conversation.history[1].role, Role::Assistant);
    }

    #[test]
    fn test_serializes_camel_case() {
        let conversation = Conversation::new("c-1", "alice");
        let value = serde_json::to_value(&conversation).unwrap();

        assert_eq!(value["userId"], "alice");
        assert_eq!(value["isActive"], true);
        assert_eq!(value["state"], "initial");
        assert_eq!(value["params"], serde_json::json!({}));
    }
}
