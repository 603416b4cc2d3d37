//! Friend Request HTTP Handlers
//!
//! A request is unique per ordered pair and never exists between users who
//! are already friends. Answering a request removes it; accepting it also
//! records the friendship in both directions.

use axum::{extract::State, Json};
use uuid::Uuid;

use super::db;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::server::state::AppState;
use crate::backend::users::db::are_friends;
use crate::shared::messaging::{
    DeleteFriendRequestRequest, FriendRequest, IncomingFriendRequest, RespondFriendRequestRequest,
    SendFriendRequestRequest,
};
use crate::shared::ApiResponse;

/// Send a friend request
pub async fn send_friend_request(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<SendFriendRequestRequest>,
) -> Result<Json<ApiResponse<FriendRequest>>, BackendError> {
    let pool = state.pool()?;
    let from = auth.user_id;
    let to = request.to;

    if from == to {
        return Err(BackendError::bad_request("You cannot send a friend request to yourself"));
    }

    get_user_by_id(pool, to)
        .await?
        .filter(|user| user.verified)
        .ok_or_else(|| {
            tracing::warn!("Friend request to unknown user: {}", to);
            BackendError::not_found("User not found")
        })?;

    if are_friends(pool, from, to).await? {
        return Err(BackendError::bad_request("You are already friends"));
    }

    if db::find_request_between(pool, from, to).await?.is_some() {
        tracing::warn!("Friend request already pending between {} and {}", from, to);
        return Err(BackendError::conflict("Friend request already pending"));
    }

    let friend_request = db::create_friend_request(pool, from, to)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                tracing::warn!("Friend request already pending between {} and {}", from, to);
                BackendError::conflict("Friend request already pending")
            }
            other => other.into(),
        })?
        .ok_or_else(|| BackendError::bad_request("You are already friends"))?;

    tracing::info!("Friend request sent from {} to {}", from, to);
    Ok(Json(ApiResponse::success("Request sent successfully!", friend_request)))
}

/// Accept or reject a friend request addressed to the caller
pub async fn respond_friend_request(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<RespondFriendRequestRequest>,
) -> Result<Json<ApiResponse<()>>, BackendError> {
    let pool = state.pool()?;

    let friend_request = db::get_friend_request(pool, request.request_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Friend request not found"))?;

    if friend_request.recipient != auth.user_id {
        tracing::warn!(
            "User {} tried to answer friend request {}",
            auth.user_id,
            friend_request.id
        );
        return Err(BackendError::forbidden("Only the recipient can answer this request"));
    }

    if request.accept {
        if !db::accept_friend_request(pool, &friend_request).await? {
            return Err(BackendError::not_found("Friend request not found"));
        }
        tracing::info!(
            "Friend request accepted: {} and {} are now friends",
            friend_request.sender,
            friend_request.recipient
        );
        Ok(Json(ApiResponse::message("Friend request accepted")))
    } else {
        db::delete_friend_request(pool, friend_request.id).await?;
        tracing::info!("Friend request {} rejected", friend_request.id);
        Ok(Json(ApiResponse::message("Friend request rejected")))
    }
}

/// Requests addressed to the caller, with the sender populated
pub async fn get_friend_requests(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<ApiResponse<Vec<IncomingFriendRequest>>>, BackendError> {
    let pool = state.pool()?;
    let requests = db::list_incoming_requests(pool, auth.user_id).await?;
    Ok(Json(ApiResponse::success(
        "Friend requests found successfully",
        requests,
    )))
}

/// Recipient IDs of the caller's outgoing requests
pub async fn get_sent_friend_requests(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<ApiResponse<Vec<Uuid>>>, BackendError> {
    let pool = state.pool()?;
    let recipients = db::list_sent_request_recipients(pool, auth.user_id).await?;
    Ok(Json(ApiResponse::success(
        "Sent requests found successfully",
        recipients,
    )))
}

/// Withdraw the caller's request to `user_id`
pub async fn delete_friend_request(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<DeleteFriendRequestRequest>,
) -> Result<Json<ApiResponse<()>>, BackendError> {
    let pool = state.pool()?;
    let user_id = request
        .user_id
        .ok_or_else(|| BackendError::bad_request("Missing user_id in the request body"))?;

    if !db::delete_request_between(pool, auth.user_id, user_id).await? {
        return Err(BackendError::not_found("Friend request not found"));
    }

    tracing::info!("Friend request from {} to {} withdrawn", auth.user_id, user_id);
    Ok(Json(ApiResponse::message("Friend request deleted successfully")))
}
