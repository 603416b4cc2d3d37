//! Authentication API integration tests
//!
//! Registration, OTP verification, login, logout and the password reset flow,
//! driven through the full router.

mod common;

use axum::http::{header, HeaderValue, StatusCode};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use chitchat::backend::auth::users::get_user_by_email;
use common::*;

#[tokio::test]
async fn test_register_sends_otp_without_session() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "Ada@Example.com",
            "password": TEST_PASSWORD,
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "OTP sent successfully");
    assert!(body.get("token").is_none());

    let sent = app.mailer.last_sent_to("ada@example.com").expect("OTP email");
    assert_eq!(sent.subject, "OTP for ChitChat");
    assert_eq!(otp_from_email(&sent.text).len(), 6);

    let user = get_user_by_email(&app.pool, "ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(!user.verified);
    assert_ne!(user.password_hash.as_deref(), Some(TEST_PASSWORD));
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({ "firstName": "Ada", "lastName": "L", "email": "nope", "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Email (nope) is invalid");

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({ "firstName": "Ada", "lastName": "L", "email": "ada@example.com", "password": "short" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["status"], "error");
}

#[tokio::test]
async fn test_verified_email_cannot_register_again() {
    let app = spawn_app().await;
    app.verified_user("Ada").await;

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "firstName": "Eve",
            "lastName": "Impostor",
            "email": "ada@example.com",
            "password": "something-else",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Email is already used");
}

#[tokio::test]
async fn test_verify_otp_flow() {
    let app = spawn_app().await;
    let user_id = app.register("Ada", "ada@example.com").await;

    let response = app
        .server
        .post("/auth/verify-otp")
        .json(&json!({ "email": "ada@example.com", "otp": "000000x" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "OTP is incorrect");

    let otp = app.last_otp("ada@example.com");
    let response = app
        .server
        .post("/auth/verify-otp")
        .json(&json!({ "email": "ada@example.com", "otp": otp }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(user_id_from(&body), user_id);
    assert!(body["token"].as_str().is_some());
    let cookie = response.header(header::SET_COOKIE);
    assert!(cookie.to_str().unwrap().starts_with("jwt="));

    // The OTP is single use.
    let response = app
        .server
        .post("/auth/verify-otp")
        .json(&json!({ "email": "ada@example.com", "otp": otp }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Email is invalid or OTP expired");
}

#[tokio::test]
async fn test_expired_otp_is_rejected() {
    let app = spawn_app().await;
    app.register("Ada", "ada@example.com").await;
    let otp = app.last_otp("ada@example.com");

    sqlx::query("UPDATE users SET otp_expiry_time = $1 WHERE email = $2")
        .bind(Utc::now() - Duration::minutes(1))
        .bind("ada@example.com")
        .execute(&app.pool)
        .await
        .unwrap();

    let response = app
        .server
        .post("/auth/verify-otp")
        .json(&json!({ "email": "ada@example.com", "otp": otp }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Email is invalid or OTP expired");
}

#[tokio::test]
async fn test_send_otp_replaces_previous_code() {
    let app = spawn_app().await;
    app.register("Ada", "ada@example.com").await;

    let response = app
        .server
        .post("/auth/send-otp")
        .json(&json!({ "email": "ada@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(app.mailer.sent().len(), 2);

    let otp = app.last_otp("ada@example.com");
    let response = app
        .server
        .post("/auth/verify-otp")
        .json(&json!({ "email": "ada@example.com", "otp": otp }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app
        .server
        .post("/auth/send-otp")
        .json(&json!({ "email": "ada@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Email is already verified");

    let response = app
        .server
        .post("/auth/send-otp")
        .json(&json!({ "email": "ghost@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login() {
    let app = spawn_app().await;
    let user = app.verified_user("Ada").await;

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": user.email, "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Logged in successfully!");
    assert_eq!(user_id_from(&body), user.id);

    for (email, password) in [
        ("ada@example.com", "wrong-password"),
        ("ghost@example.com", TEST_PASSWORD),
    ] {
        let response = app
            .server
            .post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "Email or password is incorrect");
    }

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": "ada@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Both email and password are required"
    );
}

#[tokio::test]
async fn test_protected_routes_accept_cookie_and_reject_garbage() {
    let app = spawn_app().await;
    let user = app.verified_user("Ada").await;

    let response = app.server.get("/users/get-me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["message"],
        "You are not logged in! Please log in to get access."
    );

    let response = app
        .server
        .get("/users/get-me")
        .authorization_bearer("not.a.token")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let cookie = HeaderValue::from_str(&format!("jwt={}", user.token)).unwrap();
    let response = app
        .server
        .get("/users/get-me")
        .add_header(header::COOKIE, cookie)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["data"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_logout_marks_offline_and_clears_cookie() {
    let app = spawn_app().await;
    let user = app.verified_user("Ada").await;

    let response = app
        .server
        .post("/auth/logout")
        .authorization_bearer(&user.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .header(header::SET_COOKIE)
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    let stored = get_user_by_email(&app.pool, "ada@example.com").await.unwrap().unwrap();
    assert_eq!(stored.status.as_str(), "Offline");

    let response = app.server.post("/auth/logout").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = spawn_app().await;
    let user = app.verified_user("Ada").await;

    let response = app
        .server
        .post("/auth/forgot-password")
        .json(&json!({ "email": "ghost@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "user doesn't exist");

    let response = app
        .server
        .post("/auth/forgot-password")
        .json(&json!({ "email": user.email }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let email = app.mailer.last_sent_to(&user.email).unwrap();
    assert!(email.text.contains("http://chitchat.test/auth/new-password/?token="));
    let token = reset_token_from_email(&email.text);

    let response = app
        .server
        .post("/auth/reset-password")
        .json(&json!({ "token": "deadbeef", "password": "brand-new-pass", "confirmPassword": "brand-new-pass" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Token is invalid or expired");

    let response = app
        .server
        .post("/auth/reset-password")
        .json(&json!({ "token": token, "password": "brand-new-pass", "confirmPassword": "brand-new-pass" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let new_token = response.json::<Value>()["token"].as_str().unwrap().to_string();

    // One-time use.
    let response = app
        .server
        .post("/auth/reset-password")
        .json(&json!({ "token": token, "password": "third-password", "confirmPassword": "third-password" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": user.email, "password": TEST_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": user.email, "password": "brand-new-pass" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app
        .server
        .get("/users/get-me")
        .authorization_bearer(&new_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_tokens_issued_before_password_change_are_rejected() {
    let app = spawn_app().await;
    let user = app.verified_user("Ada").await;

    sqlx::query("UPDATE users SET password_changed_at = $1 WHERE id = $2")
        .bind(Utc::now() + Duration::seconds(5))
        .bind(user.id)
        .execute(&app.pool)
        .await
        .unwrap();

    let response = app
        .server
        .get("/users/get-me")
        .authorization_bearer(&user.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_reset_token_is_rejected() {
    let app = spawn_app().await;
    let user = app.verified_user("Ada").await;

    app.server
        .post("/auth/forgot-password")
        .json(&json!({ "email": user.email }))
        .await;
    let token = reset_token_from_email(&app.mailer.last_sent_to(&user.email).unwrap().text);

    sqlx::query("UPDATE users SET password_reset_expires = $1 WHERE id = $2")
        .bind(Utc::now() - Duration::seconds(1))
        .bind(user.id)
        .execute(&app.pool)
        .await
        .unwrap();

    let response = app
        .server
        .post("/auth/reset-password")
        .json(&json!({ "token": token, "password": "brand-new-pass", "confirmPassword": "brand-new-pass" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
