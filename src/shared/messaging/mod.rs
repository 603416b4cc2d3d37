//! Messaging Module
//!
//! This module contains all the data structures for the chat domain:
//!
//! - `UserProfile` / `UserSummary` - Account views returned to clients
//! - `FriendRequest` - A pending friend request between users
//! - `Call` / `CallLogEntry` - Audio and video call records
//! - `Conversation` / `ChatMessage` - One-to-one conversations
//!
//! # Usage
//!
//! ```rust
//! use chitchat::shared::messaging::{Call, ChatMessage, Conversation, FriendRequest};
//! ```

pub mod call;
pub mod conversation;
pub mod friend_request;
pub mod message;
pub mod user;

// Re-export all types
pub use call::{
    Call, CallKind, CallLogEntry, CallStatus, CallVerdict, EndCallRequest, StartCallRequest,
    StartCallResponse, UpdateCallRequest,
};
pub use conversation::{Conversation, StartConversationRequest};
pub use friend_request::{
    DeleteFriendRequestRequest, FriendRequest, IncomingFriendRequest,
    RespondFriendRequestRequest, SendFriendRequestRequest,
};
pub use message::{ChatMessage, GetMessagesParams, MessageType, SendMessageRequest};
pub use user::{UpdateProfileRequest, UserProfile, UserStatus, UserSummary};
