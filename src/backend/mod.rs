//! Backend Module
//!
//! This module contains all server-side code for ChitChat. It provides an
//! Axum HTTP server in front of a SQLite database.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Credential lifecycle, JWT sessions, auth handlers
//! - **`middleware`** - The `protect` middleware guarding `/users`
//! - **`users`** - Profiles, user directory and friend lists
//! - **`messaging`** - Friend requests and conversations
//! - **`calls`** - Audio/video call records and the call log
//! - **`mailer`** - Outbound email (SMTP, logging, in-memory)
//! - **`error`** - Backend error type and its HTTP rendering
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── users/          - Profiles and friends
//! ├── messaging/      - Friend requests and conversations
//! ├── calls/          - Call bookkeeping
//! ├── mailer/         - Email delivery
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! Handlers share an `AppState` holding the optional database pool, the JWT
//! signing keys, the mailer and the server configuration. Nothing else is kept
//! in memory: every request is a short sequence of database calls.
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`. The error renders itself as
//! `{"status": "error", "message": ...}` with the matching status code.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Profiles, user directory, friends
pub mod users;

/// Friend requests and conversations
pub mod messaging;

/// Call bookkeeping
pub mod calls;

/// Outbound email
pub mod mailer;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::{create_app, AppState};
