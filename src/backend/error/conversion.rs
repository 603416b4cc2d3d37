/**
 * Error Conversion
 *
 * All backend errors implement `IntoResponse` from Axum, allowing them to be
 * returned directly from handlers.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "status": "error",
 *   "message": "Email or password is incorrect"
 * }
 * ```
 */

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    /// Convert a backend error into a JSON HTTP response
    ///
    /// Internal failures are logged here with their full detail; the client
    /// only sees the generic message.
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_internal() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status.as_u16(), self.message());
        }

        let body = serde_json::json!({
            "status": "error",
            "message": self.message(),
        });

        (status, Json(body)).into_response()
    }
}

/// Body rejections keep axum's status (400, 415 or 422) and its description
impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        BackendError::handler(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for BackendError {
    fn from(rejection: QueryRejection) -> Self {
        BackendError::handler(rejection.status(), rejection.body_text())
    }
}
