//! Conversation Data Structure
//!
//! Represents a one-to-one conversation between two users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::ChatMessage;

/// Represents a conversation between users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique conversation ID
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Participant user IDs
    pub participants: Vec<Uuid>,
    /// Messages in chronological order
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Check if user is a participant
    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.participants.contains(&user_id)
    }

    /// Get the other participant
    pub fn other_participant(&self, current_user_id: Uuid) -> Option<Uuid> {
        self.participants
            .iter()
            .find(|&&id| id != current_user_id)
            .copied()
    }
}

/// Request to open a conversation with a friend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartConversationRequest {
    pub to: Uuid,
}
