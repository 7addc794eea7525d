//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{analysis, snapshot, webhook};
use super::websocket::{handler::ws_handler, state::AppState};

/// Create the Axum router with all endpoints.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - viewers are browser dashboards on other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        // Webhook ingress
        .route("/webhook", post(webhook::race_webhook))
        .route("/webhook/track", post(webhook::track_webhook))
        // Snapshot & ops endpoints
        .route("/api/data", get(snapshot::get_data))
        .route("/api/car-database", get(snapshot::get_car_database))
        .route("/api/laps", get(snapshot::get_recent_laps))
        .route("/api/events", get(snapshot::get_recent_events))
        .route("/api/database/info", get(snapshot::get_database_info))
        .route("/api/session/reset", post(snapshot::reset_session))
        // Analytics endpoints
        .route("/api/analysis/stats", get(analysis::get_driver_stats))
        .route("/api/analysis/consistency", get(analysis::get_consistency))
        .route("/api/analysis/trend", get(analysis::get_trend))
        .route("/api/analysis/sectors", get(analysis::get_sectors))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
