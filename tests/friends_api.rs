//! Friend request integration tests

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use common::*;

async fn send_request(app: &TestApp, from: &TestUser, to: Uuid) -> axum_test::TestResponse {
    app.server
        .post("/users/send-friend-request")
        .authorization_bearer(&from.token)
        .json(&json!({ "to": to }))
        .await
}

#[tokio::test]
async fn test_send_and_list_requests() {
    let app = spawn_app().await;
    let ada = app.verified_user("Ada").await;
    let bob = app.verified_user("Bob").await;

    let response = send_request(&app, &ada, bob.id).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Request sent successfully!");
    assert_eq!(body["data"]["sender"], ada.id.to_string());
    assert_eq!(body["data"]["recipient"], bob.id.to_string());

    let response = app
        .server
        .get("/users/get-friend-requests")
        .authorization_bearer(&bob.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let requests = body["data"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["sender"]["_id"], ada.id.to_string());
    assert_eq!(requests[0]["sender"]["firstName"], "Ada");

    let response = app
        .server
        .get("/users/get_sent_friend_requests")
        .authorization_bearer(&ada.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["data"], json!([bob.id]));

    // Nothing incoming for the sender.
    let response = app
        .server
        .get("/users/get-friend-requests")
        .authorization_bearer(&ada.token)
        .await;
    assert_eq!(response.json::<Value>()["data"], json!([]));
}

#[tokio::test]
async fn test_duplicate_and_reverse_requests_conflict() {
    let app = spawn_app().await;
    let ada = app.verified_user("Ada").await;
    let bob = app.verified_user("Bob").await;

    assert_eq!(send_request(&app, &ada, bob.id).await.status_code(), StatusCode::OK);

    let response = send_request(&app, &ada, bob.id).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["message"], "Friend request already pending");

    let response = send_request(&app, &bob, ada.id).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_recipients() {
    let app = spawn_app().await;
    let ada = app.verified_user("Ada").await;
    let dee = app.register("Dee", "dee@example.com").await;

    let response = send_request(&app, &ada, ada.id).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = send_request(&app, &ada, Uuid::new_v4()).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "User not found");

    let response = send_request(&app, &ada, dee).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_accept_makes_friends_and_removes_request() {
    let app = spawn_app().await;
    let ada = app.verified_user("Ada").await;
    let bob = app.verified_user("Bob").await;

    app.befriend(&ada, &bob).await;

    let response = app
        .server
        .get("/users/get-friend-requests")
        .authorization_bearer(&bob.token)
        .await;
    assert_eq!(response.json::<Value>()["data"], json!([]));

    for (user, friend) in [(&ada, &bob), (&bob, &ada)] {
        let response = app
            .server
            .get("/users/get-friends")
            .authorization_bearer(&user.token)
            .await;
        let body: Value = response.json();
        assert_eq!(body["data"][0]["_id"], friend.id.to_string());
    }

    let response = send_request(&app, &bob, ada.id).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "You are already friends");
}

#[tokio::test]
async fn test_only_recipient_can_respond_and_reject_removes_request() {
    let app = spawn_app().await;
    let ada = app.verified_user("Ada").await;
    let bob = app.verified_user("Bob").await;

    let body: Value = send_request(&app, &ada, bob.id).await.json();
    let request_id = body["data"]["_id"].as_str().unwrap().to_string();

    let response = app
        .server
        .post("/users/respond-friend-request")
        .authorization_bearer(&ada.token)
        .json(&json!({ "request_id": request_id, "accept": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app
        .server
        .post("/users/respond-friend-request")
        .authorization_bearer(&bob.token)
        .json(&json!({ "request_id": request_id, "accept": false }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["message"], "Friend request rejected");

    let response = app
        .server
        .post("/users/respond-friend-request")
        .authorization_bearer(&bob.token)
        .json(&json!({ "request_id": request_id, "accept": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .server
        .get("/users/get-friends")
        .authorization_bearer(&bob.token)
        .await;
    assert_eq!(response.json::<Value>()["data"], json!([]));

    // A rejected request can be sent again.
    assert_eq!(send_request(&app, &ada, bob.id).await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_withdraw_request() {
    let app = spawn_app().await;
    let ada = app.verified_user("Ada").await;
    let bob = app.verified_user("Bob").await;

    send_request(&app, &ada, bob.id).await;

    let response = app
        .server
        .delete("/users/delete_friend_request")
        .authorization_bearer(&ada.token)
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Missing user_id in the request body"
    );

    let response = app
        .server
        .delete("/users/delete_friend_request")
        .authorization_bearer(&ada.token)
        .json(&json!({ "user_id": bob.id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["message"],
        "Friend request deleted successfully"
    );

    let response = app
        .server
        .get("/users/get_sent_friend_requests")
        .authorization_bearer(&ada.token)
        .await;
    assert_eq!(response.json::<Value>()["data"], json!([]));

    let response = app
        .server
        .delete("/users/delete_friend_request")
        .authorization_bearer(&ada.token)
        .json(&json!({ "user_id": bob.id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let app = spawn_app().await;
    let ada = app.verified_user("Ada").await;

    let response = app
        .server
        .post("/users/send-friend-request")
        .authorization_bearer(&ada.token)
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("to"));

    let response = app
        .server
        .post("/users/send-friend-request")
        .authorization_bearer(&ada.token)
        .json(&json!({ "to": "not-a-uuid" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["status"], "error");

    let response = app
        .server
        .post("/users/send-friend-request")
        .authorization_bearer(&ada.token)
        .text("{\"to\":")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(response.json::<Value>()["status"], "error");
}
