//! Common test utilities and helpers
//!
//! - `app` - A full router over an in-memory database with a recording mailer
//! - `auth_helpers` - Registering, verifying and befriending test users

#![allow(dead_code)]

pub mod app;
pub mod auth_helpers;

pub use app::*;
pub use auth_helpers::*;
