//! Friend Request Data Structure
//!
//! Represents pending friend requests between users. A request exists only
//! while it is pending: accepting or rejecting it removes the row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;

/// Represents a pending friend request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    /// Unique request ID
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// User who sent the request
    pub sender: Uuid,
    /// User who received the request
    pub recipient: Uuid,
    /// When the request was created
    pub created_at: DateTime<Utc>,
    /// When the request was last touched
    pub updated_at: DateTime<Utc>,
}

impl FriendRequest {
    /// Create a new friend request
    pub fn new(sender: Uuid, recipient: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sender,
            recipient,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the given user is on either side of the request
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.sender == user_id || self.recipient == user_id
    }
}

/// An incoming friend request with the sender populated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IncomingFriendRequest {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub sender: UserSummary,
    pub recipient: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request to send a friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendFriendRequestRequest {
    /// ID of the user to send the request to
    pub to: Uuid,
}

/// Request to respond to a friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondFriendRequestRequest {
    /// ID of the request to respond to
    pub request_id: Uuid,
    /// Whether to accept (true) or reject (false)
    pub accept: bool,
}

/// Request to withdraw a sent friend request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteFriendRequestRequest {
    /// Recipient of the request being withdrawn
    #[serde(default)]
    pub user_id: Option<Uuid>,
}
