//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation and layers
//! └── api_routes.rs   - /auth and /users route tables
//! ```
//!
//! # Route Types
//!
//! ## Public
//!
//! - `GET /health` - Liveness check
//! - `POST /auth/register`, `/auth/send-otp`, `/auth/verify-otp`
//! - `POST /auth/login`, `/auth/forgot-password`, `/auth/reset-password`
//!
//! ## Protected (session token required)
//!
//! - `POST /auth/logout`
//! - Everything under `/users`

/// Main router creation
pub mod router;

/// API route tables
pub mod api_routes;

pub use router::create_router;
