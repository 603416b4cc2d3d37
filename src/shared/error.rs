//! Shared Error Types
//!
//! This module defines validation and parsing errors that can be produced
//! while turning client input or stored column values into domain types.
//!
//! # Error Categories
//!
//! - `ValidationError` - A request field failed validation
//! - `UnknownVariant` - A stored or submitted enum value is not recognised
//!
//! # Usage
//!
//! ```rust
//! use chitchat::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Email (foo) is invalid");
//! ```
use thiserror::Error;

/// Shared error types raised outside of the HTTP layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// An enum value that does not match any known variant
    #[error("Unknown {kind} value: {value}")]
    UnknownVariant {
        /// Name of the enum being parsed
        kind: &'static str,
        /// The rejected value
        value: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown-variant error
    pub fn unknown_variant(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }

    /// Message suitable for returning to a client
    pub fn client_message(&self) -> String {
        match self {
            Self::ValidationError { message, .. } => message.clone(),
            Self::UnknownVariant { kind, value } => format!("Invalid {kind}: {value}"),
        }
    }
}
