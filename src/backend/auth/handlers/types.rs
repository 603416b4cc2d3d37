/**
 * Authentication Handler Types
 *
 * Request and response types used by the /auth handlers.
 *
 * Request fields are optional at the serde level so that a missing field is
 * reported with a readable message instead of a JSON rejection. Unknown fields
 * are ignored, which keeps clients from setting anything beyond the listed
 * fields (such as `verified`).
 */

use axum::http::header::{HeaderName, SET_COOKIE};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::response::STATUS_SUCCESS;

/// Register request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Send OTP request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Verify OTP request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Forgot password request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Reset password request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

/// Auth response
///
/// `token` is present whenever the handler established a session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

impl AuthResponse {
    pub fn new(message: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: message.into(),
            token: None,
            user_id: Some(user_id),
        }
    }

    pub fn with_token(message: impl Into<String>, user_id: Uuid, token: String) -> Self {
        Self {
            token: Some(token),
            ..Self::new(message, user_id)
        }
    }
}

/// A JSON body plus a `Set-Cookie` header
pub type WithCookie<T> = ([(HeaderName, String); 1], Json<T>);

pub fn with_cookie<T>(cookie: String, body: T) -> WithCookie<T> {
    ([(SET_COOKIE, cookie)], Json(body))
}

/// Take a required, non-blank string field
pub fn required(value: Option<String>, message: &str) -> Result<String, BackendError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(BackendError::bad_request(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_ignores_extra_fields() {
        let request: RegisterRequest = serde_json::from_value(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "password": "analytical",
            "verified": true
        }))
        .unwrap();
        assert_eq!(request.first_name.as_deref(), Some("Ada"));
        assert_eq!(request.password.as_deref(), Some("analytical"));
    }

    #[test]
    fn test_reset_request_reads_camel_case() {
        let request: ResetPasswordRequest = serde_json::from_value(json!({
            "token": "abc",
            "password": "p",
            "confirmPassword": "p"
        }))
        .unwrap();
        assert_eq!(request.confirm_password.as_deref(), Some("p"));
    }

    #[test]
    fn test_required_rejects_blank() {
        assert!(required(Some("x".to_string()), "missing").is_ok());
        assert!(required(Some("   ".to_string()), "missing").is_err());
        assert_eq!(required(None, "missing").unwrap_err().message(), "missing");
    }

    #[test]
    fn test_auth_response_omits_missing_token() {
        let body = serde_json::to_value(AuthResponse::new("OTP sent successfully", Uuid::nil()))
            .unwrap();
        assert!(body.get("token").is_none());
        assert_eq!(body["user_id"], Uuid::nil().to_string());
    }
}
