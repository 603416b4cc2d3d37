//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - The `protect` middleware guarding `/users` and logout, and
//!   the `AuthUser` extractor for the caller it attaches
//! - **`extract`** - `ApiJson` and `ApiQuery`, whose rejections use the
//!   error envelope

pub mod auth;
pub mod extract;

pub use auth::{protect, AuthUser, AuthenticatedUser};
pub use extract::{ApiJson, ApiQuery};
