/**
 * Login Handler
 *
 * This module implements POST /auth/login and POST /auth/logout.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Mark the user online
 * 4. Generate JWT token and return it in the body and the `jwt` cookie
 *
 * # Security
 *
 * - An unknown email, an account without a password and a wrong password all
 *   produce the same response (no user enumeration)
 * - User passwords are never returned in responses
 */

use axum::extract::State;

use crate::backend::auth::credentials::{normalize_email, verify_password};
use crate::backend::auth::handlers::types::{with_cookie, AuthResponse, LoginRequest, WithCookie};
use crate::backend::auth::sessions::{clear_session_cookie, session_cookie};
use crate::backend::auth::users::{get_user_by_email, set_status};
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::server::state::AppState;
use crate::shared::UserStatus;

const BAD_CREDENTIALS: &str = "Email or password is incorrect";

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - Missing field, unknown email or wrong password
/// * `503 Service Unavailable` - If database is not configured
/// * `500 Internal Server Error` - If database query or token generation fails
///
/// # Example Request
///
/// ```http
/// POST /auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "securepassword123"
/// }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "status": "success",
///   "message": "Logged in successfully!",
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "user_id": "123e4567-e89b-12d3-a456-426614174000"
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<WithCookie<AuthResponse>, BackendError> {
    let pool = state.pool()?;

    let (email, password) = match (request.email, request.password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (normalize_email(&email), password)
        }
        _ => return Err(BackendError::bad_request("Both email and password are required")),
    };
    tracing::info!("Login request for: {}", email);

    let user = get_user_by_email(pool, &email).await?.ok_or_else(|| {
        tracing::warn!("User not found: {}", email);
        BackendError::bad_request(BAD_CREDENTIALS)
    })?;

    let password_hash = user.password_hash.as_deref().ok_or_else(|| {
        tracing::warn!("User has no password set: {}", email);
        BackendError::bad_request(BAD_CREDENTIALS)
    })?;

    if !verify_password(&password, password_hash)? {
        tracing::warn!("Invalid password for user: {}", email);
        return Err(BackendError::bad_request(BAD_CREDENTIALS));
    }

    set_status(pool, user.id, UserStatus::Online).await?;
    let token = state.sessions.create_token(user.id)?;

    tracing::info!("User logged in successfully: {} ({})", user.email, user.id);

    Ok(with_cookie(
        session_cookie(&token, state.sessions.ttl()),
        AuthResponse::with_token("Logged in successfully!", user.id, token),
    ))
}

/// Logout handler
///
/// Marks the caller offline and clears the session cookie. Bearer tokens stay
/// valid until they expire; clients drop them on their side.
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<WithCookie<AuthResponse>, BackendError> {
    let pool = state.pool()?;
    set_status(pool, auth.user_id, UserStatus::Offline).await?;

    tracing::info!("User logged out: {}", auth.user_id);

    Ok(with_cookie(
        clear_session_cookie(),
        AuthResponse::new("Logged out successfully", auth.user_id),
    ))
}
