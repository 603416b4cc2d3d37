/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - The optional SQLite pool (`None` when the database could not be opened)
 * - JWT session keys
 * - The mailer used for OTP and reset emails
 * - The server configuration
 *
 * Every field is cheap to clone (`Arc` or pool handle), so the whole state is
 * cloned into each request.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::error::BackendError;
use crate::backend::mailer::Mailer;
use crate::backend::server::config::ServerConfig;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// This is `None` if the database could not be opened at startup.
    /// Handlers go through [`AppState::pool`], which maps `None` to a 503.
    pub db_pool: Option<SqlitePool>,

    /// Signing and verification keys for session tokens
    pub sessions: SessionKeys,

    /// Outbound email
    pub mailer: Arc<dyn Mailer>,

    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        db_pool: Option<SqlitePool>,
        mailer: Arc<dyn Mailer>,
        config: ServerConfig,
    ) -> Self {
        let sessions = SessionKeys::new(&config.jwt_secret, config.jwt_ttl_days);
        Self {
            db_pool,
            sessions,
            mailer,
            config: Arc::new(config),
        }
    }

    /// The database pool, or 503 when the database is not configured
    pub fn pool(&self) -> Result<&SqlitePool, BackendError> {
        self.db_pool.as_ref().ok_or_else(|| {
            tracing::error!("Database not configured");
            BackendError::DatabaseUnavailable
        })
    }
}

/// Implement FromRef for Option<SqlitePool>
impl FromRef<AppState> for Option<SqlitePool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

/// Implement FromRef for SessionKeys
impl FromRef<AppState> for SessionKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sessions.clone()
    }
}

/// Implement FromRef for the shared configuration
impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

/// State over a fresh in-memory database with a recording mailer
#[cfg(test)]
pub(crate) async fn test_state() -> (AppState, crate::backend::mailer::RecordingMailer) {
    use crate::backend::mailer::RecordingMailer;
    use crate::backend::server::config::load_database;

    let pool = load_database("sqlite::memory:").await;
    assert!(pool.is_some(), "in-memory database failed to open");
    let mailer = RecordingMailer::new();
    let config = ServerConfig {
        bcrypt_cost: 4,
        ..ServerConfig::default()
    };
    (AppState::new(pool, Arc::new(mailer.clone()), config), mailer)
}
