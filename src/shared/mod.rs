//! Shared Module
//!
//! This module contains the types that cross the HTTP boundary. Every JSON
//! body returned by the backend is built from these structures, and the field
//! names follow what the web client expects (`_id`, `firstName`, `roomID`...).

/// Shared error types
pub mod error;

/// Chat domain types: users, friend requests, calls, conversations
pub mod messaging;

/// Success response envelope
pub mod response;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use messaging::{UserProfile, UserStatus, UserSummary};
pub use response::ApiResponse;
