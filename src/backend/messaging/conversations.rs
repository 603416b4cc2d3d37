//! Conversation HTTP Handlers
//!
//! One-to-one conversations between friends. Only participants may read or
//! write a conversation.

use axum::{extract::State, Json};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::db;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, ApiQuery, AuthUser};
use crate::backend::server::state::AppState;
use crate::backend::users::db::are_friends;
use crate::shared::messaging::{
    ChatMessage, Conversation, GetMessagesParams, SendMessageRequest, StartConversationRequest,
};
use crate::shared::ApiResponse;

/// Load a conversation the caller takes part in
async fn participant_conversation(
    pool: &SqlitePool,
    conversation_id: Uuid,
    user_id: Uuid,
) -> Result<Conversation, BackendError> {
    let conversation = db::get_conversation(pool, conversation_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Conversation not found"))?;

    if !conversation.has_participant(user_id) {
        tracing::warn!(
            "User {} is not part of conversation {}",
            user_id,
            conversation_id
        );
        return Err(BackendError::forbidden("You are not part of this conversation"));
    }
    Ok(conversation)
}

/// Conversations the caller takes part in
pub async fn get_conversations(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<ApiResponse<Vec<Conversation>>>, BackendError> {
    let pool = state.pool()?;
    let conversations = db::list_conversations(pool, auth.user_id).await?;
    Ok(Json(ApiResponse::success(
        "Conversations found successfully",
        conversations,
    )))
}

/// Get or create the conversation with a friend
pub async fn start_conversation(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<StartConversationRequest>,
) -> Result<Json<ApiResponse<Conversation>>, BackendError> {
    let pool = state.pool()?;
    let to = request.to;

    if to == auth.user_id {
        return Err(BackendError::bad_request("You cannot start a conversation with yourself"));
    }
    get_user_by_id(pool, to)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    if !are_friends(pool, auth.user_id, to).await? {
        return Err(BackendError::forbidden("You can only message your friends"));
    }

    let (id, created) = db::get_or_create_conversation(pool, auth.user_id, to).await?;
    if created {
        tracing::info!("Conversation {} started between {} and {}", id, auth.user_id, to);
    }

    let conversation = participant_conversation(pool, id, auth.user_id).await?;
    Ok(Json(ApiResponse::success("Conversation ready", conversation)))
}

/// Append a message to a conversation
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<SendMessageRequest>,
) -> Result<Json<ApiResponse<ChatMessage>>, BackendError> {
    let pool = state.pool()?;
    request.validate()?;

    let conversation = participant_conversation(pool, request.conversation_id, auth.user_id).await?;
    let to = conversation
        .other_participant(auth.user_id)
        .ok_or_else(|| BackendError::bad_request("Conversation has no other participant"))?;

    let message = db::insert_message(
        pool,
        conversation.id,
        auth.user_id,
        to,
        request.message_type,
        request.text.map(|text| text.trim().to_string()),
        request.file,
    )
    .await?;

    tracing::debug!("Message {} added to conversation {}", message.id, conversation.id);
    Ok(Json(ApiResponse::success("Message sent", message)))
}

/// Messages of a conversation, oldest first
pub async fn get_messages(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiQuery(params): ApiQuery<GetMessagesParams>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, BackendError> {
    let pool = state.pool()?;
    let conversation = participant_conversation(pool, params.conversation_id, auth.user_id).await?;
    Ok(Json(ApiResponse::success(
        "Messages found successfully",
        conversation.messages,
    )))
}
