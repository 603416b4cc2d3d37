/**
 * Password Reset Handlers
 *
 * POST /auth/forgot-password emails a reset link; POST /auth/reset-password
 * redeems it.
 *
 * The link carries a random token. Only its SHA-256 digest is stored, with a
 * ten minute expiry, and a successful reset clears it so it cannot be reused.
 * The reset also records `password_changed_at`, which invalidates every
 * session token issued before it.
 */

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::backend::auth::credentials::{
    generate_reset_token, hash_password, hash_reset_token, normalize_email, validate_password,
};
use crate::backend::auth::handlers::types::{
    required, with_cookie, AuthResponse, ForgotPasswordRequest, ResetPasswordRequest, WithCookie,
};
use crate::backend::auth::sessions::session_cookie;
use crate::backend::auth::users::{
    get_user_by_email, get_user_by_reset_token, redeem_reset_token, set_password_reset, set_status,
};
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::backend::mailer::templates::reset_password_email;
use crate::backend::server::state::AppState;
use crate::shared::{ApiResponse, UserStatus};

const INVALID_TOKEN: &str = "Token is invalid or expired";

/// Link sent in the reset email
pub fn reset_url(app_url: &str, token: &str) -> String {
    format!("{}/auth/new-password/?token={token}", app_url.trim_end_matches('/'))
}

/// Forgot password handler
///
/// # Errors
///
/// * `404 Not Found` - No user with that email
/// * `500 Internal Server Error` - The email could not be sent; the stored
///   token is cleared again
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, BackendError> {
    let pool = state.pool()?;
    let email = normalize_email(&required(request.email, "Email is required")?);

    let user = get_user_by_email(pool, &email).await?.ok_or_else(|| {
        tracing::warn!("Password reset for unknown email: {}", email);
        BackendError::not_found("user doesn't exist")
    })?;

    let reset = generate_reset_token(Utc::now());
    set_password_reset(pool, user.id, Some(&reset.digest), Some(reset.expires_at)).await?;

    let url = reset_url(&state.config.app_url, &reset.token);
    let message = reset_password_email(&user.email, &user.first_name, &url);

    if let Err(e) = state.mailer.send(message).await {
        tracing::error!("Failed to send reset email to {}: {}", user.email, e);
        set_password_reset(pool, user.id, None, None).await?;
        return Err(BackendError::handler(
            StatusCode::INTERNAL_SERVER_ERROR,
            "There was an error, please try again later",
        ));
    }

    tracing::info!("Password reset link sent to {}", user.email);
    Ok(Json(ApiResponse::message("Reset Password link sent to Email")))
}

/// Reset password handler
///
/// # Errors
///
/// * `400 Bad Request` - Unknown or expired token, password too short, or the
///   confirmation does not match
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ResetPasswordRequest>,
) -> Result<WithCookie<AuthResponse>, BackendError> {
    let pool = state.pool()?;
    let token = required(request.token, INVALID_TOKEN)?;

    let now = Utc::now();
    let digest = hash_reset_token(token.trim());
    let user = get_user_by_reset_token(pool, &digest)
        .await?
        .filter(|user| user.has_live_reset_token(now))
        .ok_or_else(|| {
            tracing::warn!("Invalid or expired reset token");
            BackendError::bad_request(INVALID_TOKEN)
        })?;

    let password = required(request.password, "Password is required")?;
    let confirm = required(request.confirm_password, "Please confirm your password")?;
    validate_password(&password)?;
    if password != confirm {
        return Err(BackendError::bad_request("Passwords do not match"));
    }

    let password_hash = hash_password(&password, state.config.bcrypt_cost)?;
    if !redeem_reset_token(pool, user.id, &digest, &password_hash, now).await? {
        tracing::warn!("Reset token for {} was redeemed concurrently", user.email);
        return Err(BackendError::bad_request(INVALID_TOKEN));
    }
    set_status(pool, user.id, UserStatus::Online).await?;

    let token = state.sessions.create_token(user.id)?;
    tracing::info!("Password reset for {}", user.email);

    Ok(with_cookie(
        session_cookie(&token, state.sessions.ttl()),
        AuthResponse::with_token("Password reset successfully", user.id, token),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::credentials::verify_password;
    use crate::backend::auth::users::{create_user, get_user_by_id, NewUser, User};
    use crate::backend::mailer::{Mailer, RecordingMailer};
    use crate::backend::server::state::test_state;
    use std::sync::Arc;

    async fn seed_user(state: &AppState) -> User {
        create_user(
            state.pool().unwrap(),
            NewUser {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: hash_password("analytical", 4).unwrap(),
            },
        )
        .await
        .unwrap()
    }

    fn token_from(text: &str) -> String {
        let start = text.find("token=").unwrap() + "token=".len();
        text[start..]
            .chars()
            .take_while(|c| c.is_ascii_hexdigit())
            .collect()
    }

    fn reset_request(token: &str, password: &str, confirm: &str) -> ResetPasswordRequest {
        ResetPasswordRequest {
            token: Some(token.to_string()),
            password: Some(password.to_string()),
            confirm_password: Some(confirm.to_string()),
        }
    }

    #[test]
    fn test_reset_url() {
        assert_eq!(
            reset_url("http://localhost:3000/", "abc"),
            "http://localhost:3000/auth/new-password/?token=abc"
        );
    }

    #[tokio::test]
    async fn test_forgot_and_reset_password() {
        let (state, mailer) = test_state().await;
        let user = seed_user(&state).await;

        forgot_password(
            State(state.clone()),
            ApiJson(ForgotPasswordRequest {
                email: Some("ada@example.com".to_string()),
            }),
        )
        .await
        .unwrap();

        let token = token_from(&mailer.last_sent_to("ada@example.com").unwrap().text);
        assert_eq!(token.len(), 64);

        let stored = get_user_by_id(state.pool().unwrap(), user.id).await.unwrap().unwrap();
        assert_eq!(stored.password_reset_token, Some(hash_reset_token(&token)));

        let (_, Json(body)) = reset_password(
            State(state.clone()),
            ApiJson(reset_request(&token, "new-password", "new-password")),
        )
        .await
        .unwrap();
        assert!(body.token.is_some());

        let stored = get_user_by_id(state.pool().unwrap(), user.id).await.unwrap().unwrap();
        assert!(verify_password("new-password", stored.password_hash.as_deref().unwrap()).unwrap());
        assert!(stored.password_reset_token.is_none());
        assert!(stored.password_changed_at.is_some());

        let err = reset_password(
            State(state),
            ApiJson(reset_request(&token, "another-one", "another-one")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_resets_redeem_token_once() {
        let (state, mailer) = test_state().await;
        let user = seed_user(&state).await;
        forgot_password(
            State(state.clone()),
            ApiJson(ForgotPasswordRequest {
                email: Some("ada@example.com".to_string()),
            }),
        )
        .await
        .unwrap();
        let token = token_from(&mailer.last_sent_to("ada@example.com").unwrap().text);

        let (first, second) = tokio::join!(
            reset_password(
                State(state.clone()),
                ApiJson(reset_request(&token, "first-password", "first-password")),
            ),
            reset_password(
                State(state.clone()),
                ApiJson(reset_request(&token, "second-password", "second-password")),
            ),
        );

        let winner = match (first, second) {
            (Ok(_), Err(err)) => {
                assert_eq!(err.message(), INVALID_TOKEN);
                "first-password"
            }
            (Err(err), Ok(_)) => {
                assert_eq!(err.message(), INVALID_TOKEN);
                "second-password"
            }
            (first, second) => panic!(
                "expected exactly one reset to succeed: {:?} / {:?}",
                first.is_ok(),
                second.is_ok()
            ),
        };

        let stored = get_user_by_id(state.pool().unwrap(), user.id).await.unwrap().unwrap();
        assert!(verify_password(winner, stored.password_hash.as_deref().unwrap()).unwrap());
    }

    #[tokio::test]
    async fn test_confirmation_must_match() {
        let (state, mailer) = test_state().await;
        seed_user(&state).await;
        forgot_password(
            State(state.clone()),
            ApiJson(ForgotPasswordRequest {
                email: Some("ada@example.com".to_string()),
            }),
        )
        .await
        .unwrap();
        let token = token_from(&mailer.last_sent_to("ada@example.com").unwrap().text);

        let err = reset_password(
            State(state),
            ApiJson(reset_request(&token, "new-password", "other-password")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.message(), "Passwords do not match");
    }

    #[tokio::test]
    async fn test_forgot_password_unknown_email() {
        let (state, _mailer) = test_state().await;
        let err = forgot_password(
            State(state),
            ApiJson(ForgotPasswordRequest {
                email: Some("nobody@example.com".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "user doesn't exist");
    }

    #[tokio::test]
    async fn test_failed_email_clears_reset_token() {
        let (mut state, _mailer) = test_state().await;
        let failing: Arc<dyn Mailer> = Arc::new(RecordingMailer::failing());
        state.mailer = failing;
        let user = seed_user(&state).await;

        let err = forgot_password(
            State(state.clone()),
            ApiJson(ForgotPasswordRequest {
                email: Some("ada@example.com".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "There was an error, please try again later");

        let stored = get_user_by_id(state.pool().unwrap(), user.id).await.unwrap().unwrap();
        assert!(stored.password_reset_token.is_none());
        assert!(stored.password_reset_expires.is_none());
    }
}
