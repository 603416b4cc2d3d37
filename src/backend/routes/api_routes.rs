/**
 * API Route Tables
 *
 * # Routes
 *
 * ## Authentication (`/auth`)
 * - `POST /register` - Create or refresh an unverified account, email an OTP
 * - `POST /send-otp` - Email a fresh OTP
 * - `POST /verify-otp` - Verify the account and log in
 * - `POST /login` - Log in with email and password
 * - `POST /forgot-password` - Email a reset link
 * - `POST /reset-password` - Set a new password with the reset token
 * - `POST /logout` - Mark offline and clear the cookie (requires a session)
 *
 * ## Users (`/users`, all require a session)
 * - Profile: `GET /get-me`, `PATCH /update-me`
 * - Directory: `GET /get-users`, `GET /get-all-verified-users`, `GET /get-friends`
 * - Friend requests: `POST /send-friend-request`, `POST /respond-friend-request`,
 *   `GET /get-friend-requests`, `GET /get_sent_friend_requests`,
 *   `DELETE /delete_friend_request`
 * - Calls: `POST /start-audio-call`, `POST /start-video-call`,
 *   `PATCH /update-call`, `POST /end-call`, `GET /get-call-logs`
 * - Conversations: `GET /get-conversations`, `POST /start-conversation`,
 *   `POST /send-message`, `GET /get-messages`
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};

use crate::backend::auth::{
    forgot_password, login, logout, register, reset_password, send_otp, verify_otp,
};
use crate::backend::calls::{
    end_call, get_call_logs, start_audio_call, start_video_call, update_call,
};
use crate::backend::messaging::{
    delete_friend_request, get_conversations, get_friend_requests, get_messages,
    get_sent_friend_requests, respond_friend_request, send_friend_request, send_message,
    start_conversation,
};
use crate::backend::middleware::protect;
use crate::backend::server::state::AppState;
use crate::backend::users::{get_all_verified_users, get_friends, get_me, get_users, update_me};

/// Routes mounted under `/auth`
///
/// Only `/logout` goes through `protect`.
pub fn configure_auth_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route(
            "/logout",
            post(logout).route_layer(from_fn_with_state(app_state, protect)),
        )
}

/// Routes mounted under `/users`, all behind `protect`
pub fn configure_user_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        // Profile and directory
        .route("/get-me", get(get_me))
        .route("/update-me", patch(update_me))
        .route("/get-users", get(get_users))
        .route("/get-all-verified-users", get(get_all_verified_users))
        .route("/get-friends", get(get_friends))
        // Friend requests
        .route("/send-friend-request", post(send_friend_request))
        .route("/respond-friend-request", post(respond_friend_request))
        .route("/get-friend-requests", get(get_friend_requests))
        .route("/get_sent_friend_requests", get(get_sent_friend_requests))
        .route("/delete_friend_request", delete(delete_friend_request))
        // Calls
        .route("/start-audio-call", post(start_audio_call))
        .route("/start-video-call", post(start_video_call))
        .route("/update-call", patch(update_call))
        .route("/end-call", post(end_call))
        .route("/get-call-logs", get(get_call_logs))
        // Conversations
        .route("/get-conversations", get(get_conversations))
        .route("/start-conversation", post(start_conversation))
        .route("/send-message", post(send_message))
        .route("/get-messages", get(get_messages))
        .route_layer(from_fn_with_state(app_state, protect))
}
