//! User HTTP Handlers
//!
//! GET /users/get-me, PATCH /users/update-me and the directory listings.

use axum::{extract::State, Json};

use super::db;
use crate::backend::auth::users::{update_profile, ProfileChanges};
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::server::state::AppState;
use crate::shared::messaging::UpdateProfileRequest;
use crate::shared::{ApiResponse, UserProfile, UserSummary};

/// The caller's own profile
pub async fn get_me(AuthUser(auth): AuthUser) -> Json<ApiResponse<UserProfile>> {
    Json(ApiResponse::success(
        "User found successfully",
        UserProfile::from(&auth.user),
    ))
}

/// Update the caller's profile
///
/// Only `firstName`, `lastName`, `about` and `avatar` are read from the body;
/// anything else is ignored.
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, BackendError> {
    let pool = state.pool()?;
    request.validate()?;

    if request.is_empty() {
        return Ok(Json(ApiResponse::success(
            "Profile updated successfully!",
            UserProfile::from(&auth.user),
        )));
    }

    let changes = ProfileChanges {
        first_name: request.first_name.map(|name| name.trim().to_string()),
        last_name: request.last_name.map(|name| name.trim().to_string()),
        about: request.about,
        avatar: request.avatar,
    };

    let user = update_profile(pool, auth.user_id, changes).await?;
    tracing::info!("Profile updated for user: {}", user.id);

    Ok(Json(ApiResponse::success(
        "Profile updated successfully!",
        UserProfile::from(&user),
    )))
}

/// Verified users the caller could befriend
pub async fn get_users(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, BackendError> {
    let pool = state.pool()?;
    let users = db::list_non_friends(pool, auth.user_id).await?;
    Ok(Json(ApiResponse::success("Users found successfully", users)))
}

/// Every verified user except the caller
pub async fn get_all_verified_users(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, BackendError> {
    let pool = state.pool()?;
    let users = db::list_verified_users(pool, auth.user_id).await?;
    Ok(Json(ApiResponse::success("Users found successfully!", users)))
}

pub async fn get_friends(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, BackendError> {
    let pool = state.pool()?;
    let friends = db::list_friends(pool, auth.user_id).await?;
    Ok(Json(ApiResponse::success("Friends found successfully", friends)))
}
