/**
 * Backend Error Types
 *
 * This module defines the error type returned by HTTP handlers.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Raised deliberately by a handler with a status code and a message that is
 * safe to show to the client: missing fields, wrong OTP, expired reset token,
 * not a participant, and so on.
 *
 * ## Infrastructure Errors
 *
 * Wrapped failures from sqlx, bcrypt, jsonwebtoken or the mailer.
 * These are logged with full detail and reported to the client as a generic
 * 500 so that internals never leak.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::mailer::MailError;
use crate::shared::SharedError;

/// Message shown to clients for any internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong, please try again later";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use chitchat::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::CONFLICT, "Friend request already pending");
/// assert_eq!(err.status_code(), StatusCode::CONFLICT);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with a client-facing message
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// The database pool was never established
    #[error("Database not configured")]
    DatabaseUnavailable,

    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// bcrypt failure while hashing or verifying
    #[error("Hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Session token could not be created
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Outbound email failed
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// Validation error from the shared module
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    /// 401 Unauthorized
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    /// 403 Forbidden
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    /// 404 Not Found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// 409 Conflict
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::CONFLICT, message)
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `DatabaseUnavailable` - 503 Service Unavailable
    /// - `SharedError` - 400 Bad Request
    /// - everything else - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::Database(_)
            | Self::Hashing(_)
            | Self::Token(_)
            | Self::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error hides an internal failure from the client
    pub fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
            && !matches!(self, Self::HandlerError { .. })
    }

    /// Get the client-facing error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::DatabaseUnavailable => "Database not configured".to_string(),
            Self::SharedError(err) => err.client_message(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}
