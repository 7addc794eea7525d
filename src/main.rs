//! Trackside Telemetry Server - Binary Entry Point

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use trackside::analytics::AnalyticsEngine;
use trackside::api::http::create_router;
use trackside::api::websocket::{AppState, Broadcaster};
use trackside::config::ServerConfig;
use trackside::event_log::{spawn_writer, EventLog, EventLogConfig};
use trackside::ingest::IngestPipeline;
use trackside::state::RaceStateStore;

/// Broadcast channel capacity: viewers further behind than this miss
/// events and get a fresh snapshot instead.
const BROADCAST_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    info!(
        version = trackside::VERSION,
        data_dir = %config.data_dir.display(),
        "starting trackside server"
    );

    let log_config = EventLogConfig::new(&config.data_dir);
    let event_log = EventLog::open(log_config.clone())?;
    let log_writer = spawn_writer(event_log);

    let store = Arc::new(RaceStateStore::new());
    let broadcaster = Arc::new(Broadcaster::new(BROADCAST_CAPACITY));
    let pipeline = Arc::new(IngestPipeline::new(
        Arc::clone(&store),
        log_writer,
        Arc::clone(&broadcaster),
    ));
    let analytics = Arc::new(AnalyticsEngine::new(log_config));

    let state = Arc::new(AppState::new(store, pipeline, analytics, broadcaster));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    info!("webhooks: POST /webhook (race data), POST /webhook/track (track data)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
