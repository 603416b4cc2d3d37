//! Chat Message Data Structure
//!
//! Represents a single message inside a one-to-one conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Maximum length of a text message
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Type of message content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Text,
    Media,
    Document,
    Link,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "Text",
            MessageType::Media => "Media",
            MessageType::Document => "Document",
            MessageType::Link => "Link",
        }
    }
}

impl std::str::FromStr for MessageType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Text" => Ok(MessageType::Text),
            "Media" => Ok(MessageType::Media),
            "Document" => Ok(MessageType::Document),
            "Link" => Ok(MessageType::Link),
            other => Err(SharedError::unknown_variant("message type", other)),
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub from: Uuid,
    pub to: Uuid,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub text: Option<String>,
    pub file: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to send a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub conversation_id: Uuid,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "type", default)]
    pub message_type: MessageType,
    #[serde(default)]
    pub file: Option<String>,
}

impl SendMessageRequest {
    /// Text messages need text, other types need a file reference
    pub fn validate(&self) -> Result<(), SharedError> {
        let text = self.text.as_deref().map(str::trim).unwrap_or_default();
        match self.message_type {
            MessageType::Text | MessageType::Link if text.is_empty() => {
                Err(SharedError::validation("text", "Message text cannot be empty"))
            }
            MessageType::Media | MessageType::Document if self.file.is_none() => {
                Err(SharedError::validation("file", "A file is required for this message type"))
            }
            _ if text.len() > MAX_MESSAGE_LEN => Err(SharedError::validation(
                "text",
                format!("Message text cannot exceed {MAX_MESSAGE_LEN} characters"),
            )),
            _ => Ok(()),
        }
    }
}

/// Query parameters for listing messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMessagesParams {
    pub conversation_id: Uuid,
}
