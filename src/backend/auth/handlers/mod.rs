//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - Registration
//! ├── otp.rs       - OTP issuance and verification
//! ├── login.rs     - Login and logout
//! └── password.rs  - Forgot / reset password
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /auth/register
//! - **`send_otp`** - POST /auth/send-otp
//! - **`verify_otp`** - POST /auth/verify-otp
//! - **`login`** - POST /auth/login
//! - **`logout`** - POST /auth/logout (requires a session)
//! - **`forgot_password`** - POST /auth/forgot-password
//! - **`reset_password`** - POST /auth/reset-password
//!
//! Handlers that establish a session answer with the token in the body and in
//! the `jwt` cookie.

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// OTP handlers
pub mod otp;

/// Login and logout handlers
pub mod login;

/// Password reset handlers
pub mod password;

pub use types::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    SendOtpRequest, VerifyOtpRequest,
};

pub use login::{login, logout};
pub use otp::{send_otp, verify_otp};
pub use password::{forgot_password, reset_password};
pub use register::register;
