//! Authentication test helpers
//!
//! Users are created through the public API, reading the OTP out of the
//! recorded email, so tests exercise the same path as real clients.

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use super::app::TestApp;

pub const TEST_PASSWORD: &str = "password123";

/// A verified user with a live session
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub first_name: String,
    pub email: String,
    pub token: String,
}

/// Six-digit OTP from the body of an OTP email
pub fn otp_from_email(text: &str) -> String {
    let marker = "Your OTP is ";
    let start = text.find(marker).expect("OTP email without an OTP") + marker.len();
    text[start..start + 6].to_string()
}

/// Reset token from the link in a reset email
pub fn reset_token_from_email(text: &str) -> String {
    let start = text.find("token=").expect("Reset email without a token") + "token=".len();
    text[start..]
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect()
}

pub fn user_id_from(body: &Value) -> Uuid {
    body["user_id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("response without user_id")
}

impl TestApp {
    /// POST /auth/register and return the new user's ID
    pub async fn register(&self, first_name: &str, email: &str) -> Uuid {
        let response = self
            .server
            .post("/auth/register")
            .json(&json!({
                "firstName": first_name,
                "lastName": "Tester",
                "email": email,
                "password": TEST_PASSWORD,
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        user_id_from(&response.json::<Value>())
    }

    /// The OTP most recently emailed to `email`
    pub fn last_otp(&self, email: &str) -> String {
        let sent = self
            .mailer
            .last_sent_to(email)
            .expect("no email sent to this address");
        otp_from_email(&sent.text)
    }

    /// Register and verify a user, returning their session
    pub async fn verified_user(&self, first_name: &str) -> TestUser {
        let email = format!("{}@example.com", first_name.to_lowercase());
        let id = self.register(first_name, &email).await;

        let response = self
            .server
            .post("/auth/verify-otp")
            .json(&json!({ "email": email, "otp": self.last_otp(&email) }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();

        TestUser {
            id,
            first_name: first_name.to_string(),
            email,
            token: body["token"].as_str().expect("token").to_string(),
        }
    }

    /// Send a friend request from `from` to `to` and accept it
    pub async fn befriend(&self, from: &TestUser, to: &TestUser) {
        let response = self
            .server
            .post("/users/send-friend-request")
            .authorization_bearer(&from.token)
            .json(&json!({ "to": to.id }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        let request_id = body["data"]["_id"].as_str().expect("request id").to_string();

        let response = self
            .server
            .post("/users/respond-friend-request")
            .authorization_bearer(&to.token)
            .json(&json!({ "request_id": request_id, "accept": true }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
}
