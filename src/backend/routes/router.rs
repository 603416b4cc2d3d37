/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * - `TraceLayer` logs every request and response through `tracing`
 * - `CorsLayer::permissive()` lets the browser client call the API from
 *   another origin
 */

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::{configure_auth_routes, configure_user_routes};
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// Unknown paths answer 404 in the usual error envelope.
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(health));

    let router = router
        .nest("/auth", configure_auth_routes(app_state.clone()))
        .nest("/users", configure_user_routes(app_state.clone()));

    router
        .fallback(|| async { BackendError::not_found("Route not found") })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn health() -> &'static str {
    "ok"
}
