//! Conversation persistence.
//!
//! Every write that makes a conversation active first archives the user's
//! other active conversations inside the same transaction; the partial
//! unique index on `(user_id) WHERE is_active = 1` rejects anything that
//! slips past.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DatabaseError;
use crate::models::ConversationRecord;
use crate::Result;

/// Create a new active conversation, archiving any other active one.
pub async fn create_conversation(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<ConversationRecord> {
    let mut tx = pool.begin().await?;

    let archived = sqlx::query(
        r#"
        UPDATE conversations
        SET is_active = 0,
            updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
        WHERE user_id = ? AND is_active = 1
        "#,
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query(
        r#"
        INSERT INTO conversations (id, user_id)
        VALUES (?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| DatabaseError::from_conversation_write(e, id, user_id))?;

    let record = sqlx::query_as::<_, ConversationRecord>(
        r#"
        SELECT id, user_id, params, history, state, intent, is_active,
               questions_asked, suggestion_given, created_at, updated_at
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    debug!(conversation_id = id, user_id, archived, "CONVERSATION_CREATED");
    Ok(record)
}

/// Get a conversation by id.
pub async fn get_conversation(pool: &SqlitePool, id: &str) -> Result<Option<ConversationRecord>> {
    let record = sqlx::query_as::<_, ConversationRecord>(
        r#"
        SELECT id, user_id, params, history, state, intent, is_active,
               questions_asked, suggestion_given, created_at, updated_at
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Get the user's active conversation, if any.
pub async fn get_active_conversation(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<ConversationRecord>> {
    let record = sqlx::query_as::<_, ConversationRecord>(
        r#"
        SELECT id, user_id, params, history, state, intent, is_active,
               questions_asked, suggestion_given, created_at, updated_at
        FROM conversations
        WHERE user_id = ? AND is_active = 1
        ORDER BY updated_at DESC, rowid DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Persist every mutable field of a conversation.
///
/// `created_at` and `updated_at` on the record are ignored; `updated_at` is
/// bumped by the database.
pub async fn save_conversation(pool: &SqlitePool, record: &ConversationRecord) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET params = ?,
            history = ?,
            state = ?,
            intent = ?,
            is_active = ?,
            questions_asked = ?,
            suggestion_given = ?,
            updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&record.params)
    .bind(&record.history)
    .bind(&record.state)
    .bind(&record.intent)
    .bind(record.is_active)
    .bind(record.questions_asked)
    .bind(record.suggestion_given)
    .bind(&record.id)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_conversation_write(e, &record.id, &record.user_id))?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "conversation",
            id: record.id.clone(),
        });
    }

    Ok(())
}

/// Archive one conversation.
pub async fn archive_conversation(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET is_active = 0,
            updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "conversation",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Archive every active conversation of a user. Returns how many changed.
pub async fn archive_all_for_user(pool: &SqlitePool, user_id: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET is_active = 0,
            updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
        WHERE user_id = ? AND is_active = 1
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Make `id` the user's only active conversation.
///
/// Fails with `NotFound` if the conversation does not exist or belongs to
/// another user.
pub async fn activate_exclusive(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<ConversationRecord> {
    let mut tx = pool.begin().await?;

    let owned: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT id
        FROM conversations
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    if owned.is_none() {
        return Err(DatabaseError::NotFound {
            entity: "conversation",
            id: id.to_string(),
        });
    }

    let archived = sqlx::query(
        r#"
        UPDATE conversations
        SET is_active = 0,
            updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
        WHERE user_id = ? AND id != ? AND is_active = 1
        "#,
    )
    .bind(user_id)
    .bind(id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query(
        r#"
        UPDATE conversations
        SET is_active = 1
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(|e| DatabaseError::from_conversation_write(e, id, user_id))?;

    let record = sqlx::query_as::<_, ConversationRecord>(
        r#"
        SELECT id, user_id, params, history, state, intent, is_active,
               questions_asked, suggestion_given, created_at, updated_at
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    debug!(conversation_id = id, user_id, archived, "CONVERSATION_ACTIVATED");
    Ok(record)
}

/// Save `current` as archived and open a new active conversation seeded with
/// `history`, in one transaction.
///
/// On any failure nothing changes: `current` keeps its stored state.
pub async fn archive_and_create(
    pool: &SqlitePool,
    current: &ConversationRecord,
    id: &str,
    history: &str,
) -> Result<ConversationRecord> {
    let user_id = current.user_id.as_str();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET params = ?,
            history = ?,
            state = ?,
            intent = ?,
            is_active = 0,
            questions_asked = ?,
            suggestion_given = ?,
            updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&current.params)
    .bind(&current.history)
    .bind(&current.state)
    .bind(&current.intent)
    .bind(current.questions_asked)
    .bind(current.suggestion_given)
    .bind(&current.id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "conversation",
            id: current.id.clone(),
        });
    }

    sqlx::query(
        r#"
        UPDATE conversations
        SET is_active = 0,
            updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
        WHERE user_id = ? AND is_active = 1
        "#,
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO conversations (id, user_id, history)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(history)
    .execute(&mut *tx)
    .await
    .map_err(|e| DatabaseError::from_conversation_write(e, id, user_id))?;

    let record = sqlx::query_as::<_, ConversationRecord>(
        r#"
        SELECT id, user_id, params, history, state, intent, is_active,
               questions_asked, suggestion_given, created_at, updated_at
        FROM conversations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    debug!(
        archived_id = %current.id,
        conversation_id = id,
        user_id,
        "CONVERSATION_ARCHIVED_AND_CREATED"
    );
    Ok(record)
}

/// List a user's conversations, most recently updated first.
pub async fn list_conversations_for_user(
    pool: &SqlitePool,
    user_id: &str,
    active_only: bool,
) -> Result<Vec<ConversationRecord>> {
    let records = sqlx::query_as::<_, ConversationRecord>(
        r#"
        SELECT id, user_id, params, history, state, intent, is_active,
               questions_asked, suggestion_given, created_at, updated_at
        FROM conversations
        WHERE user_id = ? AND (? = 0 OR is_active = 1)
        ORDER BY updated_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Count a user's active conversations.
pub async fn count_active_for_user(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM conversations
        WHERE user_id = ? AND is_active = 1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
