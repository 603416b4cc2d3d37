/**
 * Register Handler
 *
 * POST /auth/register
 *
 * # Registration Process
 *
 * 1. Validate names, email format and password length
 * 2. Reject emails that already belong to a verified user
 * 3. Create the user, or refresh the names and password of an unverified one
 * 4. Issue and email an OTP
 *
 * No session is created here; the client logs in through verify-otp.
 */

use axum::{extract::State, Json};

use crate::backend::auth::credentials::{
    hash_password, normalize_email, validate_email, validate_password,
};
use crate::backend::auth::handlers::otp::issue_otp;
use crate::backend::auth::handlers::types::{required, AuthResponse, RegisterRequest};
use crate::backend::auth::users::{create_user, get_user_by_email, update_unverified_user, NewUser};
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::backend::server::state::AppState;

const EMAIL_TAKEN: &str = "Email is already used";

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - Missing or invalid field, or the email belongs to a
///   verified user
/// * `503 Service Unavailable` - If database is not configured
/// * `500 Internal Server Error` - Hashing, database or mail failure
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let pool = state.pool()?;

    let first_name = required(request.first_name, "First name is required")?;
    let last_name = required(request.last_name, "Last name is required")?;
    let email = required(request.email, "Email is required")?;
    let password = required(request.password, "Password is required")?;

    validate_email(email.trim())?;
    validate_password(&password)?;
    let email = normalize_email(&email);

    tracing::info!("Register request for: {}", email);

    let existing = get_user_by_email(pool, &email).await?;
    if existing.as_ref().is_some_and(|user| user.verified) {
        tracing::warn!("Registration with verified email: {}", email);
        return Err(BackendError::bad_request(EMAIL_TAKEN));
    }

    let new_user = NewUser {
        first_name: first_name.trim().to_string(),
        last_name: last_name.trim().to_string(),
        email: email.clone(),
        password_hash: hash_password(&password, state.config.bcrypt_cost)?,
    };

    let user = match existing {
        Some(user) => update_unverified_user(pool, user.id, new_user).await?,
        None => create_user(pool, new_user).await.map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                tracing::warn!("Concurrent registration for: {}", email);
                BackendError::bad_request(EMAIL_TAKEN)
            }
            other => other.into(),
        })?,
    };

    issue_otp(&state, pool, &user).await?;
    tracing::info!("User registered: {} ({})", user.email, user.id);

    Ok(Json(AuthResponse::new("OTP sent successfully", user.id)))
}
