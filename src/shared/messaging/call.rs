//! Call Data Structures
//!
//! Audio and video calls share one record shape; `CallKind` tells them apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserProfile;
use crate::shared::error::SharedError;

/// Media type of a call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Audio,
    Video,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Audio => "audio",
            CallKind::Video => "video",
        }
    }
}

impl std::str::FromStr for CallKind {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(CallKind::Audio),
            "video" => Ok(CallKind::Video),
            other => Err(SharedError::unknown_variant("call kind", other)),
        }
    }
}

/// Outcome of a call from the callee's side
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CallVerdict {
    Accepted,
    Denied,
    Missed,
    Busy,
}

impl CallVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallVerdict::Accepted => "Accepted",
            CallVerdict::Denied => "Denied",
            CallVerdict::Missed => "Missed",
            CallVerdict::Busy => "Busy",
        }
    }

    /// Any verdict other than `Accepted` ends the call
    pub fn ends_call(&self) -> bool {
        !matches!(self, CallVerdict::Accepted)
    }
}

impl std::str::FromStr for CallVerdict {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Accepted" => Ok(CallVerdict::Accepted),
            "Denied" => Ok(CallVerdict::Denied),
            "Missed" => Ok(CallVerdict::Missed),
            "Busy" => Ok(CallVerdict::Busy),
            other => Err(SharedError::unknown_variant("call verdict", other)),
        }
    }
}

/// Lifecycle state of a call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CallStatus {
    Ongoing,
    Ended,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Ongoing => "Ongoing",
            CallStatus::Ended => "Ended",
        }
    }
}

impl std::str::FromStr for CallStatus {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ongoing" => Ok(CallStatus::Ongoing),
            "Ended" => Ok(CallStatus::Ended),
            other => Err(SharedError::unknown_variant("call status", other)),
        }
    }
}

/// A call between two users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub kind: CallKind,
    pub from: Uuid,
    pub to: Uuid,
    pub verdict: Option<CallVerdict>,
    pub status: CallStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Call {
    /// Start a new ongoing call
    pub fn start(kind: CallKind, from: Uuid, to: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            from,
            to,
            verdict: None,
            status: CallStatus::Ongoing,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    pub fn participants(&self) -> [Uuid; 2] {
        [self.from, self.to]
    }

    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.from == user_id || self.to == user_id
    }

    /// A call counts as missed unless the callee accepted it
    pub fn is_missed(&self) -> bool {
        self.verdict != Some(CallVerdict::Accepted)
    }

    /// Whether the call reached `user_id` rather than being placed by them
    pub fn is_incoming_for(&self, user_id: Uuid) -> bool {
        self.from != user_id
    }

    /// The participant that is not `user_id`
    pub fn other_party(&self, user_id: Uuid) -> Uuid {
        if self.from == user_id {
            self.to
        } else {
            self.from
        }
    }
}

/// One row of the call log view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallLogEntry {
    pub id: Uuid,
    pub kind: CallKind,
    pub img: Option<String>,
    pub name: String,
    pub online: bool,
    pub incoming: bool,
    pub missed: bool,
    pub started_at: DateTime<Utc>,
}

/// Request to start a call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartCallRequest {
    /// ID of the user being called
    pub id: Uuid,
}

/// Data the client needs to join the call room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartCallResponse {
    /// Profile of the callee
    pub from: UserProfile,
    #[serde(rename = "roomID")]
    pub room_id: Uuid,
    #[serde(rename = "streamID")]
    pub stream_id: Uuid,
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    #[serde(rename = "userName")]
    pub user_name: Uuid,
}

/// Request to record the callee's verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCallRequest {
    pub room_id: Uuid,
    pub verdict: CallVerdict,
}

/// Request to hang up a call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndCallRequest {
    pub room_id: Uuid,
}
