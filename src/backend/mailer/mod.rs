//! Mailer Module
//!
//! Outbound email for OTP delivery and password reset links.
//!
//! # Implementations
//!
//! - **`SmtpMailer`** - Sends through an SMTP relay with lettre
//! - **`LogMailer`** - Logs the message instead of sending it (development)
//! - **`RecordingMailer`** - Keeps sent messages in memory (tests, local tooling)
//!
//! Handlers only see `Arc<dyn Mailer>` from `AppState`.

pub mod smtp;
pub mod templates;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

pub use smtp::SmtpMailer;

/// A single outbound email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Errors raised while building or delivering an email
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("mailer unavailable: {0}")]
    Unavailable(String),
}

/// Delivers outbound email
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Mailer that only logs what it would have sent
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(to = %email.to, subject = %email.subject, "Email not sent (log mailer)");
        tracing::debug!("Email body:\n{}", email.text);
        Ok(())
    }
}

/// Mailer that records every message in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    fail_sends: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder that rejects every send
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail_sends: true,
        }
    }

    /// All messages sent so far, oldest first
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Most recent message sent to `address`
    pub fn last_sent_to(&self, address: &str) -> Option<OutgoingEmail> {
        self.sent()
            .into_iter()
            .rev()
            .find(|email| email.to == address)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if self.fail_sends {
            return Err(MailError::Unavailable("recording mailer set to fail".to_string()));
        }
        self.sent
            .lock()
            .map_err(|_| MailError::Unavailable("recording mailer poisoned".to_string()))?
            .push(email);
        Ok(())
    }
}
