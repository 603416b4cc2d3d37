//! Credential lifecycle helpers
//!
//! Password hashing, one-time passcodes and password reset tokens. Nothing
//! secret is ever stored in plaintext:
//!
//! - passwords and OTPs are bcrypt-hashed
//! - reset tokens are stored as a SHA-256 digest; the plaintext only travels
//!   in the email link

use bcrypt::{hash, verify};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

use crate::shared::SharedError;

pub const OTP_LENGTH: usize = 6;
pub const OTP_TTL_MINUTES: i64 = 10;
pub const RESET_TOKEN_BYTES: usize = 32;
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a password (or OTP) with bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Compare a candidate against a stored bcrypt hash
pub fn verify_password(candidate: &str, hashed: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(candidate, hashed)
}

/// Generate a numeric one-time passcode
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Compare a submitted OTP against the stored hash
pub fn verify_otp(candidate: &str, otp_hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(candidate.trim(), otp_hash)
}

pub fn otp_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(OTP_TTL_MINUTES)
}

/// A freshly generated password reset token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    /// Sent to the user, never stored
    pub token: String,
    /// Stored in the user row
    pub digest: String,
    pub expires_at: DateTime<Utc>,
}

pub fn generate_reset_token(now: DateTime<Utc>) -> ResetToken {
    let bytes: [u8; RESET_TOKEN_BYTES] = rand::thread_rng().gen();
    let token = hex::encode(bytes);
    let digest = hash_reset_token(&token);
    ResetToken {
        token,
        digest,
        expires_at: now + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
    }
}

/// SHA-256 hex digest of a reset token
pub fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r#"^[^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*@([a-zA-Z0-9\-]+\.)+[a-zA-Z]{2,}$"#)
            .expect("email regex is valid")
    })
}

pub fn validate_email(email: &str) -> Result<(), SharedError> {
    if email_regex().is_match(&email.to_lowercase()) {
        Ok(())
    } else {
        Err(SharedError::validation("email", format!("Email ({email}) is invalid")))
    }
}

pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

/// Emails are matched case-insensitively and stored lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
