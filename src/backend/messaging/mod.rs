//! Messaging Module
//!
//! This module handles friend requests and one-to-one conversations.
//!
//! - **`friend_requests`** - Send, answer, list and withdraw friend requests
//! - **`conversations`** - Conversation listing, start, send and read
//! - **`db`** - Queries shared by both

pub mod conversations;
pub mod db;
pub mod friend_requests;

pub use conversations::{get_conversations, get_messages, send_message, start_conversation};
pub use friend_requests::{
    delete_friend_request, get_friend_requests, get_sent_friend_requests, respond_friend_request,
    send_friend_request,
};
