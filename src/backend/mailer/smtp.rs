//! SMTP delivery through lettre

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::{MailError, Mailer, OutgoingEmail};
use crate::backend::server::config::SmtpSettings;

/// Mailer that relays through an SMTP server over TLS
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the transport; no connection is made until the first send
    pub fn new(settings: &SmtpSettings, from: &str) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
            .port(settings.port);

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: from.parse()?,
        })
    }
}

/// Build a multipart (text + HTML) message
pub fn build_message(from: &Mailbox, email: &OutgoingEmail) -> Result<Message, MailError> {
    let message = Message::builder()
        .from(from.clone())
        .to(email.to.parse()?)
        .subject(email.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            email.html.clone(),
        ))?;
    Ok(message)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(&self.from, &email)?;
        self.transport.send(message).await?;
        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}
