//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored conversation row.
///
/// `params` and `history` are JSON text; interpreting them is the caller's
/// job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ConversationRecord {
    /// Opaque conversation id (UUID string).
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Known parameters as a JSON object.
    pub params: String,
    /// Ordered turns as a JSON array.
    pub history: String,
    /// Lifecycle state label.
    pub state: String,
    /// Last classified intent label, if any.
    pub intent: Option<String>,
    /// Whether this is the user's current conversation.
    pub is_active: bool,
    /// Number of parameter questions asked so far.
    pub questions_asked: i64,
    /// Whether the early-evaluation hint was already shown.
    pub suggestion_given: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}
