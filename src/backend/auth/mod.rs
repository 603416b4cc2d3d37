//! Authentication Module
//!
//! This module handles registration, OTP verification, login and the password
//! reset flow, along with the credential primitives they rely on.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── credentials.rs  - bcrypt, OTP and reset token helpers
//! ├── sessions.rs     - JWT token management and the session cookie
//! ├── users.rs        - User model and database operations
//! └── handlers/       - HTTP handlers for /auth
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: names, email and password → unverified user → OTP emailed
//! 2. **Verify OTP**: email and OTP → user verified → JWT token returned
//! 3. **Login**: email and password → credentials verified → JWT token returned
//! 4. **Forgot / Reset**: email → reset link emailed → token and new password
//!    → password replaced → JWT token returned
//!
//! # Security
//!
//! - Passwords and OTPs are hashed using bcrypt before storage
//! - Reset tokens are stored as a SHA-256 digest and are single use
//! - Session tokens expire after `JWT_TTL_DAYS` and are invalidated by a
//!   password change

/// Password, OTP and reset token helpers
pub mod credentials;

/// JWT token generation and validation
pub mod sessions;

/// User data model and database operations
pub mod users;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{
    forgot_password, login, logout, register, reset_password, send_otp, verify_otp,
};
pub use sessions::{Claims, SessionKeys};
pub use users::User;
