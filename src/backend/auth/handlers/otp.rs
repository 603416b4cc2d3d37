/**
 * OTP Handlers
 *
 * POST /auth/send-otp issues a fresh one-time passcode; POST /auth/verify-otp
 * consumes it and marks the account verified.
 *
 * # OTP Lifecycle
 *
 * 1. Six random digits are generated
 * 2. The bcrypt hash and an expiry ten minutes out are stored on the user
 * 3. The plaintext is emailed and never stored
 * 4. A correct, unexpired OTP verifies the account and is cleared
 */

use axum::{extract::State, Json};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::backend::auth::credentials::{
    generate_otp, hash_password, normalize_email, otp_expiry, verify_otp as otp_matches,
};
use crate::backend::auth::handlers::types::{
    required, with_cookie, AuthResponse, SendOtpRequest, VerifyOtpRequest, WithCookie,
};
use crate::backend::auth::sessions::session_cookie;
use crate::backend::auth::users::{get_user_by_email, mark_verified, set_otp, set_status, User};
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::backend::mailer::templates::otp_email;
use crate::backend::server::state::AppState;
use crate::shared::UserStatus;

/// Generate, store and email a new OTP for `user`
///
/// Any previous OTP is replaced.
pub async fn issue_otp(state: &AppState, pool: &SqlitePool, user: &User) -> Result<(), BackendError> {
    let otp = generate_otp();
    let otp_hash = hash_password(&otp, state.config.bcrypt_cost)?;
    set_otp(pool, user.id, &otp_hash, otp_expiry(Utc::now())).await?;

    state
        .mailer
        .send(otp_email(&user.email, &user.first_name, &otp))
        .await?;

    tracing::info!("OTP sent to {}", user.email);
    Ok(())
}

/// Send OTP handler
///
/// # Errors
///
/// * `400 Bad Request` - Email missing or already verified
/// * `404 Not Found` - No user with that email
/// * `500 Internal Server Error` - Hashing, database or mail failure
pub async fn send_otp(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SendOtpRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let pool = state.pool()?;
    let email = normalize_email(&required(request.email, "Email is required")?);

    let user = get_user_by_email(pool, &email).await?.ok_or_else(|| {
        tracing::warn!("OTP requested for unknown email: {}", email);
        BackendError::not_found("user doesn't exist")
    })?;

    if user.verified {
        tracing::warn!("OTP requested for verified user: {}", email);
        return Err(BackendError::bad_request("Email is already verified"));
    }

    issue_otp(&state, pool, &user).await?;

    Ok(Json(AuthResponse::new("OTP sent successfully", user.id)))
}

/// Verify OTP handler
///
/// On success the user is verified, marked online and logged in.
///
/// # Errors
///
/// * `400 Bad Request` - No live OTP for the email, already verified, or a
///   wrong OTP
pub async fn verify_otp(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VerifyOtpRequest>,
) -> Result<WithCookie<AuthResponse>, BackendError> {
    let pool = state.pool()?;
    let email = normalize_email(&request.email.unwrap_or_default());
    let otp = required(request.otp, "Email is invalid or OTP expired")?;

    let now = Utc::now();
    let user = get_user_by_email(pool, &email)
        .await?
        .filter(|user| user.has_live_otp(now))
        .ok_or_else(|| {
            tracing::warn!("No live OTP for: {}", email);
            BackendError::bad_request("Email is invalid or OTP expired")
        })?;

    if user.verified {
        return Err(BackendError::bad_request("Email is already verified"));
    }

    let otp_hash = user.otp_hash.as_deref().unwrap_or_default();
    if !otp_matches(&otp, otp_hash)? {
        tracing::warn!("Incorrect OTP for: {}", email);
        return Err(BackendError::bad_request("OTP is incorrect"));
    }

    if !mark_verified(pool, user.id, otp_hash).await? {
        tracing::warn!("OTP for {} was consumed concurrently", email);
        return Err(BackendError::bad_request("Email is invalid or OTP expired"));
    }
    set_status(pool, user.id, UserStatus::Online).await?;

    let token = state.sessions.create_token(user.id)?;
    tracing::info!("User verified: {}", user.email);

    Ok(with_cookie(
        session_cookie(&token, state.sessions.ttl()),
        AuthResponse::with_token("OTP verified Successfully!", user.id, token),
    ))
}
