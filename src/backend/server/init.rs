/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server.
 *
 * # Initialization Process
 *
 * 1. Open the database and run migrations (optional; failure is logged)
 * 2. Build the mailer selected by configuration
 * 3. Assemble `AppState`
 * 4. Create and configure the router
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::mailer::{LogMailer, MailError, Mailer, SmtpMailer};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, MailerKind, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// # Error Handling
///
/// - Missing database: the server continues and data endpoints answer 503
/// - Mailer misconfiguration: returned as an error, since registration cannot
///   work without it
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, MailError> {
    tracing::info!("Initializing ChitChat backend server");

    let db_pool = load_database(&config.database_url).await;
    let mailer = build_mailer(&config)?;

    let app_state = AppState::new(db_pool, mailer, config);
    let app = create_router(app_state);

    tracing::info!("Router configured");
    Ok(app)
}

/// Build the mailer selected by `MAILER`
pub fn build_mailer(config: &ServerConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match (config.mailer, &config.smtp) {
        (MailerKind::Smtp, Some(settings)) => {
            tracing::info!("Using SMTP mailer via {}:{}", settings.host, settings.port);
            Ok(Arc::new(SmtpMailer::new(settings, &config.mail_from)?))
        }
        (MailerKind::Smtp, None) => Err(MailError::Unavailable(
            "MAILER=smtp requires SMTP_HOST".to_string(),
        )),
        (MailerKind::Log, _) => {
            tracing::warn!("Using log mailer: emails are written to the log, not sent");
            Ok(Arc::new(LogMailer))
        }
    }
}
