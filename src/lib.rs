//! ChitChat - Chat Backend Library
//!
//! ChitChat is the server side of a one-to-one chat application. It covers
//! account registration with email verification by one-time passcode,
//! password login with a reset flow, friend requests, audio/video call
//! bookkeeping and conversation listing.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types returned to clients and shared validation errors
//!   - Users, friend requests, calls, conversations and messages
//!
//! - **`backend`** - Axum HTTP server
//!   - Credential lifecycle (bcrypt passwords, OTPs, reset tokens, JWT sessions)
//!   - Route configuration and the `protect` middleware
//!   - SQLite persistence through sqlx
//!   - Outbound email
//!
//! # Usage
//!
//! ```rust,no_run
//! use chitchat::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for validation failures
//! - `backend::BackendError` for everything a handler can return; it renders
//!   itself as a JSON error response

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
