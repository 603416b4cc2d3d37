//! Response envelope
//!
//! Successful responses share one shape: `{"status": "success", "message":
//! ..., "data": ...}`. Errors use the same `status`/`message` pair with
//! `"error"` (see `backend::error`).

use serde::{Deserialize, Serialize};

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Success envelope carrying `data`
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success envelope with only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_only_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("done")).unwrap();
        assert_eq!(body, json!({"status": "success", "message": "done"}));
    }

    #[test]
    fn test_success_wraps_data() {
        let body = serde_json::to_value(ApiResponse::success("found", vec![1, 2])).unwrap();
        assert_eq!(body["data"], json!([1, 2]));
        assert_eq!(body["status"], "success");
    }
}
