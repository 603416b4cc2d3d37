/**
 * Server Configuration
 *
 * This module handles loading of server configuration from environment
 * variables (a `.env` file is read by the binary before this runs) and the
 * creation of the SQLite connection pool.
 *
 * # Variables
 *
 * | Variable         | Default                              |
 * |------------------|--------------------------------------|
 * | `DATABASE_URL`   | `sqlite://chitchat.db?mode=rwc`      |
 * | `SERVER_PORT`    | `3000`                               |
 * | `JWT_SECRET`     | development fallback, logged loudly  |
 * | `JWT_TTL_DAYS`   | `30` (1 to 365)                      |
 * | `BCRYPT_COST`    | `12` (4 to 31)                       |
 * | `APP_URL`        | `http://localhost:3000`              |
 * | `MAIL_FROM`      | `ChitChat <no-reply@chitchat.local>` |
 * | `MAILER`         | `log` (or `smtp`)                    |
 * | `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD` | |
 *
 * # Error Handling
 *
 * Malformed values are configuration errors and stop startup. A database
 * that cannot be opened does not: the server starts without it and data
 * endpoints answer 503.
 */

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

const DEV_JWT_SECRET: &str = "chitchat-development-secret-change-me";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}

/// Which mailer implementation to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailerKind {
    Smtp,
    Log,
}

impl FromStr for MailerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smtp" => Ok(MailerKind::Smtp),
            "log" => Ok(MailerKind::Log),
            other => Err(ConfigError::InvalidValue {
                key: "MAILER",
                value: other.to_string(),
            }),
        }
    }
}

/// SMTP relay settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_days: i64,
    pub bcrypt_cost: u32,
    /// Base URL of the web client, used in password reset links
    pub app_url: String,
    pub mail_from: String,
    pub mailer: MailerKind,
    pub smtp: Option<SmtpSettings>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://chitchat.db?mode=rwc".to_string(),
            port: 3000,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_ttl_days: 30,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            app_url: "http://localhost:3000".to_string(),
            mail_from: "ChitChat <no-reply@chitchat.local>".to_string(),
            mailer: MailerKind::Log,
            smtp: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let mailer = match lookup("MAILER") {
            Some(value) => value.parse()?,
            None => defaults.mailer,
        };

        let smtp = match lookup("SMTP_HOST") {
            Some(host) => Some(SmtpSettings {
                host,
                port: parse_or("SMTP_PORT", lookup("SMTP_PORT"), 587)?,
                username: lookup("SMTP_USERNAME"),
                password: lookup("SMTP_PASSWORD"),
            }),
            None => None,
        };

        if mailer == MailerKind::Smtp && smtp.is_none() {
            return Err(ConfigError::MissingValue("SMTP_HOST"));
        }

        let bcrypt_cost = parse_or("BCRYPT_COST", lookup("BCRYPT_COST"), defaults.bcrypt_cost)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let jwt_ttl_days = parse_or("JWT_TTL_DAYS", lookup("JWT_TTL_DAYS"), defaults.jwt_ttl_days)?;
        if !(1..=365).contains(&jwt_ttl_days) {
            return Err(ConfigError::InvalidValue {
                key: "JWT_TTL_DAYS",
                value: jwt_ttl_days.to_string(),
            });
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            port: parse_or("SERVER_PORT", lookup("SERVER_PORT"), defaults.port)?,
            jwt_secret,
            jwt_ttl_days,
            bcrypt_cost,
            app_url: lookup("APP_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.app_url),
            mail_from: lookup("MAIL_FROM").unwrap_or(defaults.mail_from),
            mailer,
            smtp,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}

/// Open a SQLite pool for `database_url`
///
/// In-memory databases are limited to one long-lived connection, since every
/// new connection would see an empty database.
pub async fn connect_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(8)
    };

    pool_options.connect_with(options).await
}

/// Apply the embedded migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}

/// Load and initialize the database connection pool
///
/// # Returns
///
/// - `Some(SqlitePool)` if the database is open and migrated
/// - `None` if the connection or the migrations fail
pub async fn load_database(database_url: &str) -> Option<SqlitePool> {
    tracing::info!("Connecting to database...");

    let pool = match connect_database(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    if let Err(e) = run_migrations(&pool).await {
        tracing::error!("Failed to run database migrations: {}", e);
        tracing::warn!("Database features will be disabled.");
        return None;
    }

    tracing::info!("Database ready");
    Some(pool)
}
