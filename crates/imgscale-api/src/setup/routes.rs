//! Route configuration and setup

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Build the application router.
///
/// The resize endpoint reads its transform path from the `path` query
/// parameter, matching the URL shape `/resize?path={width}x{height}/{key}`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/resize", get(handlers::resize::resize))
        .route("/health", get(handlers::health::health_check))
        .route("/live", get(handlers::health::liveness_check))
        .with_state(state)
}
