/**
 * Authentication Middleware
 *
 * This module provides the `protect` middleware for routes that require a
 * logged-in user. It reads the session token from the Authorization header
 * or the `jwt` cookie, verifies it, loads the user, and attaches the user to
 * the request extensions for handlers.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::token_from_cookie_header;
use crate::backend::auth::users::{get_user_by_id, User};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

pub const NOT_LOGGED_IN: &str = "You are not logged in! Please log in to get access.";
const INVALID_TOKEN: &str = "Invalid or expired token. Please log in again.";
const USER_GONE: &str = "User doesn't exist";
const PASSWORD_CHANGED: &str = "Password was changed recently. Please log in again.";

/// The caller, as loaded by `protect`
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub user: User,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            user,
        }
    }
}

/// Session token from `Authorization: Bearer …`, falling back to the cookie
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|value| value.starts_with("Bearer"))
        .and_then(|value| value.split_whitespace().nth(1));

    bearer.or_else(|| {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .find_map(token_from_cookie_header)
    })
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the session token (Bearer header or `jwt` cookie)
/// 2. Verifies the token signature and expiry
/// 3. Loads the user named by the token
/// 4. Rejects tokens issued before the user's last password change
/// 5. Attaches the user to request extensions for use in handlers
///
/// Every rejection is a 401.
pub async fn protect(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = session_token(request.headers()).ok_or_else(|| {
        tracing::warn!("Request without session token: {}", request.uri());
        BackendError::unauthorized(NOT_LOGGED_IN)
    })?;

    let claims = app_state.sessions.verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthorized(INVALID_TOKEN)
    })?;

    let user_id = claims.user_id().ok_or_else(|| {
        tracing::warn!("Invalid user ID in token: {}", claims.sub);
        BackendError::unauthorized(INVALID_TOKEN)
    })?;

    let pool = app_state.pool()?;
    let user = get_user_by_id(pool, user_id).await?.ok_or_else(|| {
        tracing::warn!("Token for deleted user: {}", user_id);
        BackendError::unauthorized(USER_GONE)
    })?;

    if user
        .password_changed_at
        .is_some_and(|changed_at| claims.issued_before(changed_at))
    {
        tracing::warn!("Token predates password change for user: {}", user_id);
        return Err(BackendError::unauthorized(PASSWORD_CHANGED));
    }

    request.extensions_mut().insert(AuthenticatedUser::from(user));

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only usable behind `protect`; elsewhere it rejects with 401.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized(NOT_LOGGED_IN)
            })?;

        Ok(AuthUser(user))
    }
}
