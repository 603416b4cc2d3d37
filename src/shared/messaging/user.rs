//! User Data Structures
//!
//! Client-facing views of a user account. The stored row (with password and
//! OTP hashes) lives in `backend::auth::users` and never leaves the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Presence status of a user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum UserStatus {
    Online,
    #[default]
    Offline,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Online => "Online",
            UserStatus::Offline => "Offline",
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Online" => Ok(UserStatus::Online),
            "Offline" => Ok(UserStatus::Offline),
            other => Err(SharedError::unknown_variant("user status", other)),
        }
    }
}

impl TryFrom<String> for UserStatus {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Full profile of a user, as returned by `get-me` and `update-me`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub about: Option<String>,
    pub avatar: Option<String>,
    pub verified: bool,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal user view used in listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

/// Body of `PATCH /users/update-me`
///
/// Only these fields can be changed through the profile endpoint; anything
/// else in the request body is ignored by deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UpdateProfileRequest {
    /// Reject blank names; the other fields may be cleared to empty strings
    pub fn validate(&self) -> Result<(), SharedError> {
        if matches!(&self.first_name, Some(name) if name.trim().is_empty()) {
            return Err(SharedError::validation("firstName", "First name is required"));
        }
        if matches!(&self.last_name, Some(name) if name.trim().is_empty()) {
            return Err(SharedError::validation("lastName", "Last name is required"));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.about.is_none()
            && self.avatar.is_none()
    }
}
