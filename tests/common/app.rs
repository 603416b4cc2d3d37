//! Test application fixture

use std::sync::Arc;

use axum_test::TestServer;
use chitchat::backend::mailer::RecordingMailer;
use chitchat::backend::routes::create_router;
use chitchat::backend::server::config::{load_database, ServerConfig};
use chitchat::backend::server::AppState;
use sqlx::SqlitePool;

/// The router plus handles on its database and outbox
pub struct TestApp {
    pub server: TestServer,
    pub mailer: RecordingMailer,
    pub pool: SqlitePool,
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        jwt_secret: "integration-test-secret".to_string(),
        bcrypt_cost: 4,
        app_url: "http://chitchat.test".to_string(),
        ..ServerConfig::default()
    }
}

/// Build a fresh app; every call gets its own in-memory database
pub async fn spawn_app() -> TestApp {
    let pool = load_database("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    let mailer = RecordingMailer::new();

    let state = AppState::new(Some(pool.clone()), Arc::new(mailer.clone()), test_config());
    let server = TestServer::new(create_router(state)).expect("Failed to start test server");

    TestApp {
        server,
        mailer,
        pool,
    }
}
