//! Database operations for messaging
//!
//! This module contains database operations for friend requests and
//! one-to-one conversations.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::backend::users::db::add_friendship;
use crate::shared::messaging::{
    ChatMessage, Conversation, FriendRequest, IncomingFriendRequest, MessageType,
};
use crate::shared::UserSummary;

fn friend_request_from_row(row: &SqliteRow) -> Result<FriendRequest, sqlx::Error> {
    Ok(FriendRequest {
        id: row.try_get("id")?,
        sender: row.try_get("sender_id")?,
        recipient: row.try_get("recipient_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Create a new friend request
///
/// Returns `None` when the two users are already friends. A pending request
/// between the pair in either direction fails with a unique violation.
pub async fn create_friend_request(
    pool: &SqlitePool,
    sender: Uuid,
    recipient: Uuid,
) -> Result<Option<FriendRequest>, sqlx::Error> {
    let request = FriendRequest::new(sender, recipient);

    let result = sqlx::query(
        r#"
        INSERT INTO friend_requests (id, sender_id, recipient_id, created_at, updated_at)
        SELECT $1, $2, $3, $4, $5
        WHERE NOT EXISTS (
            SELECT 1 FROM friendships WHERE user_id = $2 AND friend_id = $3
        )
        "#,
    )
    .bind(request.id)
    .bind(request.sender)
    .bind(request.recipient)
    .bind(request.created_at)
    .bind(request.updated_at)
    .execute(pool)
    .await?;

    Ok((result.rows_affected() == 1).then_some(request))
}

pub async fn get_friend_request(
    pool: &SqlitePool,
    id: Uuid,
) -> Result<Option<FriendRequest>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, sender_id, recipient_id, created_at, updated_at FROM friend_requests WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(friend_request_from_row).transpose()
}

/// A pending request between two users, in either direction
pub async fn find_request_between(
    pool: &SqlitePool,
    a: Uuid,
    b: Uuid,
) -> Result<Option<FriendRequest>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, sender_id, recipient_id, created_at, updated_at
        FROM friend_requests
        WHERE (sender_id = $1 AND recipient_id = $2)
           OR (sender_id = $2 AND recipient_id = $1)
        LIMIT 1
        "#,
    )
    .bind(a)
    .bind(b)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(friend_request_from_row).transpose()
}

/// Requests addressed to `user_id`, with the sender populated
pub async fn list_incoming_requests(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<IncomingFriendRequest>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT r.id, r.recipient_id, r.created_at,
               u.id AS sender_id, u.first_name, u.last_name
        FROM friend_requests r
        JOIN users u ON u.id = r.sender_id
        WHERE r.recipient_id = $1
        ORDER BY r.rowid
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<IncomingFriendRequest, sqlx::Error> {
            Ok(IncomingFriendRequest {
                id: row.try_get("id")?,
                sender: UserSummary {
                    id: row.try_get("sender_id")?,
                    first_name: row.try_get("first_name")?,
                    last_name: row.try_get("last_name")?,
                },
                recipient: row.try_get("recipient_id")?,
                created_at: row.try_get("created_at")?,
            })
        })
        .collect()
}

/// Recipient IDs of requests sent by `user_id`
pub async fn list_sent_request_recipients(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT recipient_id FROM friend_requests WHERE sender_id = $1 ORDER BY rowid",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Delete the request from `sender` to `recipient`; returns whether one existed
pub async fn delete_request_between(
    pool: &SqlitePool,
    sender: Uuid,
    recipient: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM friend_requests WHERE sender_id = $1 AND recipient_id = $2")
        .bind(sender)
        .bind(recipient)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_friend_request(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM friend_requests WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Turn a request into a friendship and remove it, atomically
///
/// Every request between the pair goes with it. Returns `false` when the
/// request was already answered.
pub async fn accept_friend_request(
    pool: &SqlitePool,
    request: &FriendRequest,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let claimed = sqlx::query("DELETE FROM friend_requests WHERE id = $1")
        .bind(request.id)
        .execute(&mut *tx)
        .await?;
    if claimed.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query(
        r#"
        DELETE FROM friend_requests
        WHERE (sender_id = $1 AND recipient_id = $2)
           OR (sender_id = $2 AND recipient_id = $1)
        "#,
    )
    .bind(request.sender)
    .bind(request.recipient)
    .execute(&mut *tx)
    .await?;

    add_friendship(&mut tx, request.sender, request.recipient).await?;
    tx.commit().await?;
    Ok(true)
}

fn message_from_row(row: &SqliteRow) -> Result<ChatMessage, sqlx::Error> {
    let message_type: String = row.try_get("message_type")?;
    Ok(ChatMessage {
        id: row.try_get("id")?,
        conversation_id: row.try_get("conversation_id")?,
        from: row.try_get("from_user_id")?,
        to: row.try_get("to_user_id")?,
        message_type: message_type
            .parse::<MessageType>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        text: row.try_get("text")?,
        file: row.try_get("file")?,
        created_at: row.try_get("created_at")?,
    })
}

/// The conversation between `a` and `b`, created on first use
///
/// The pair is stored ordered, so concurrent callers in either direction end
/// up with the same conversation. Returns the ID and whether it was created.
pub async fn get_or_create_conversation(
    pool: &SqlitePool,
    a: Uuid,
    b: Uuid,
) -> Result<(Uuid, bool), sqlx::Error> {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pool.begin().await?;
    let inserted = sqlx::query(
        r#"
        INSERT INTO conversations (id, pair_low, pair_high, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        ON CONFLICT (pair_low, pair_high) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(low)
    .bind(high)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if inserted.rows_affected() == 0 {
        let existing: Uuid = sqlx::query_scalar(
            "SELECT id FROM conversations WHERE pair_low = $1 AND pair_high = $2",
        )
        .bind(low)
        .bind(high)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        return Ok((existing, false));
    }

    for user_id in [a, b] {
        sqlx::query(
            "INSERT INTO conversation_participants (conversation_id, user_id, joined_at) VALUES ($1, $2, $3)",
        )
        .bind(id)
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok((id, true))
}

/// Messages of a conversation, oldest first
pub async fn list_messages(
    pool: &SqlitePool,
    conversation_id: Uuid,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, conversation_id, from_user_id, to_user_id, message_type, text, file, created_at
        FROM messages
        WHERE conversation_id = $1
        ORDER BY rowid
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(message_from_row).collect()
}

/// Load a conversation with its participants and messages
pub async fn get_conversation(
    pool: &SqlitePool,
    id: Uuid,
) -> Result<Option<Conversation>, sqlx::Error> {
    let Some(row) = sqlx::query("SELECT id, created_at, updated_at FROM conversations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let participants: Vec<Uuid> = sqlx::query_scalar(
        "SELECT user_id FROM conversation_participants WHERE conversation_id = $1 ORDER BY rowid",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(Some(Conversation {
        id,
        participants,
        messages: list_messages(pool, id).await?,
        created_at,
        updated_at,
    }))
}

/// Conversations `user_id` takes part in, most recently active first
pub async fn list_conversations(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<Conversation>, sqlx::Error> {
    let ids: Vec<Uuid> = sqlx::query_scalar(
        "SELECT conversation_id FROM conversation_participants WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut conversations = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(conversation) = get_conversation(pool, id).await? {
            conversations.push(conversation);
        }
    }
    conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(conversations)
}

/// Append a message and bump the conversation's `updated_at`
pub async fn insert_message(
    pool: &SqlitePool,
    conversation_id: Uuid,
    from: Uuid,
    to: Uuid,
    message_type: MessageType,
    text: Option<String>,
    file: Option<String>,
) -> Result<ChatMessage, sqlx::Error> {
    let message = ChatMessage {
        id: Uuid::new_v4(),
        conversation_id,
        from,
        to,
        message_type,
        text,
        file,
        created_at: Utc::now(),
    };

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO messages (id, conversation_id, from_user_id, to_user_id, message_type, text, file, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(message.id)
    .bind(message.conversation_id)
    .bind(message.from)
    .bind(message.to)
    .bind(message.message_type.as_str())
    .bind(&message.text)
    .bind(&message.file)
    .bind(message.created_at)
    .execute(&mut *tx)
    .await?;
    sqlx::query("UPDATE conversations SET updated_at = $1 WHERE id = $2")
        .bind(message.created_at)
        .bind(conversation_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(message)
}
