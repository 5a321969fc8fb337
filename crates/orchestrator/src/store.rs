//! Conversation storage seam and its SQLite implementation.

use async_trait::async_trait;
use catalog::ParamSet;
use database::{conversation, ConversationRecord, Database};
use oracle_core::Turn;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::conversation::Conversation;
use crate::error::StoreError;
use crate::intent::Intent;
use crate::state::ConversationState;

/// Where conversations live between messages.
///
/// Implementations must keep at most one active conversation per user.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// The conversation to continue for `user_id`.
    ///
    /// A `requested_id` naming an active conversation of this user is
    /// honored; any other id is ignored. Without one, the user's active
    /// conversation is returned, or a new one is created.
    async fn active_or_create(
        &self,
        user_id: &str,
        requested_id: Option<&str>,
    ) -> Result<Conversation, StoreError>;

    /// Start a new active conversation, archiving the current one.
    async fn create(&self, user_id: &str) -> Result<Conversation, StoreError>;

    /// Persist every mutable field.
    async fn save(&self, conversation: &Conversation) -> Result<(), StoreError>;

    /// Save `current` as archived and start a new active conversation whose
    /// history is `opening`. Both happen or neither does.
    async fn archive_and_start(
        &self,
        current: &Conversation,
        opening: &[Turn],
    ) -> Result<Conversation, StoreError>;

    /// All of a user's conversations, most recently updated first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Conversation>, StoreError>;
}

/// Parse a JSON column, unwrapping one level of string encoding.
///
/// Empty text and `null` become `None`.
fn decode_json(raw: &str) -> Result<Option<Value>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(raw)? {
        Value::Null => Ok(None),
        Value::String(inner) if inner.trim().is_empty() => Ok(None),
        Value::String(inner) => decode_json(&inner),
        value => Ok(Some(value)),
    }
}

fn corrupt(id: &str, field: &'static str, reason: impl ToString) -> StoreError {
    StoreError::Corrupt {
        id: id.to_string(),
        field,
        reason: reason.to_string(),
    }
}

impl TryFrom<ConversationRecord> for Conversation {
    type Error = StoreError;

    fn try_from(record: ConversationRecord) -> Result<Self, Self::Error> {
        let params = match decode_json(&record.params) {
            Ok(Some(value)) => ParamSet::from_json_value(&value),
            Ok(None) => ParamSet::new(),
            Err(e) => return Err(corrupt(&record.id, "params", e)),
        };

        let history = match decode_json(&record.history) {
            Ok(Some(value)) => serde_json::from_value::<Vec<Turn>>(value)
                .map_err(|e| corrupt(&record.id, "history", e))?,
            Ok(None) => Vec::new(),
            Err(e) => return Err(corrupt(&record.id, "history", e)),
        };

        let state = ConversationState::from_label(&record.state).ok_or_else(|| {
            corrupt(&record.id, "state", format!("unknown state {:?}", record.state))
        })?;

        let intent = record.intent.as_deref().and_then(|label| {
            let intent = Intent::from_label(label);
            if intent.is_none() {
                warn!(conversation_id = %record.id, label, "UNKNOWN_STORED_INTENT");
            }
            intent
        });

        Ok(Conversation {
            id: record.id,
            user_id: record.user_id,
            params,
            history,
            state,
            intent,
            questions_asked: u32::try_from(record.questions_asked).unwrap_or_default(),
            is_active: record.is_active,
            suggestion_given: record.suggestion_given,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl TryFrom<&Conversation> for ConversationRecord {
    type Error = StoreError;

    fn try_from(conversation: &Conversation) -> Result<Self, Self::Error> {
        let params = serde_json::to_string(&conversation.params)
            .map_err(|e| corrupt(&conversation.id, "params", e))?;
        let history = serde_json::to_string(&conversation.history)
            .map_err(|e| corrupt(&conversation.id, "history", e))?;

        Ok(ConversationRecord {
            id: conversation.id.clone(),
            user_id: conversation.user_id.clone(),
            params,
            history,
            state: conversation.state.as_str().to_string(),
            intent: conversation.intent.map(|i| i.as_str().to_string()),
            is_active: conversation.is_active,
            questions_asked: i64::from(conversation.questions_asked),
            suggestion_given: conversation.suggestion_given,
            created_at: conversation.created_at.clone(),
            updated_at: conversation.updated_at.clone(),
        })
    }
}

#[async_trait]
impl ConversationStore for Database {
    async fn active_or_create(
        &self,
        user_id: &str,
        requested_id: Option<&str>,
    ) -> Result<Conversation, StoreError> {
        if let Some(id) = requested_id.map(str::trim).filter(|id| !id.is_empty()) {
            match conversation::get_conversation(self.pool(), id).await? {
                Some(record) if record.user_id == user_id && record.is_active => {
                    let record = conversation::activate_exclusive(self.pool(), user_id, id).await?;
                    return Conversation::try_from(record);
                }
                Some(_) => {
                    debug!(conversation_id = id, user_id, "REQUESTED_CONVERSATION_NOT_ACTIVE");
                }
                None => {
                    debug!(conversation_id = id, user_id, "REQUESTED_CONVERSATION_UNKNOWN");
                }
            }
        }

        match conversation::get_active_conversation(self.pool(), user_id).await? {
            Some(record) => Conversation::try_from(record),
            None => self.create(user_id).await,
        }
    }

    async fn create(&self, user_id: &str) -> Result<Conversation, StoreError> {
        let id = Uuid::new_v4().to_string();
        let record = conversation::create_conversation(self.pool(), &id, user_id).await?;
        Conversation::try_from(record)
    }

    async fn save(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let record = ConversationRecord::try_from(conversation)?;
        conversation::save_conversation(self.pool(), &record).await?;
        Ok(())
    }

    async fn archive_and_start(
        &self,
        current: &Conversation,
        opening: &[Turn],
    ) -> Result<Conversation, StoreError> {
        let record = ConversationRecord::try_from(current)?;
        let id = Uuid::new_v4().to_string();
        let history = serde_json::to_string(opening).map_err(|e| corrupt(&id, "history", e))?;

        let fresh = conversation::archive_and_create(self.pool(), &record, &id, &history).await?;
        Conversation::try_from(fresh)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Conversation>, StoreError> {
        conversation::list_conversations_for_user(self.pool(), user_id, false)
            .await?
            .into_iter()
            .map(Conversation::try_from)
            .collect()
    }
}
