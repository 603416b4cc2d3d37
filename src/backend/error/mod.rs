//! Backend Error Module
//!
//! This module defines the error type returned by every HTTP handler.
//!
//! # Architecture
//!
//! - **`types`** - Error type definitions and constructors
//! - **`conversion`** - `IntoResponse` implementation
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use chitchat::backend::error::BackendError;
//!
//! fn check(email: &str) -> Result<(), BackendError> {
//!     if email.is_empty() {
//!         return Err(BackendError::bad_request("Email is required"));
//!     }
//!     Ok(())
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
