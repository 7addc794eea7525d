//! Trackside Telemetry Server
//!
//! Ingests live telemetry from slot-car race timing controllers via
//! webhook pushes, maintains the authoritative in-memory race state,
//! persists an append-only lap-event log, and fans full-snapshot updates
//! out to connected viewers over WebSocket.
//!
//! # Modules
//!
//! - `types`: Core data structures (CanonicalEvent, DriverState, RaceState)
//! - `normalizer`: Alias-table normalization of heterogeneous payloads
//! - `state`: The lock-guarded race state store and merge logic
//! - `event_log`: Append-only JSONL persistence with a background writer
//! - `analytics`: Read-only aggregation queries over the event log
//! - `ingest`: The normalize → merge → persist → broadcast pipeline
//! - `api`: Axum HTTP surface and the WebSocket push channel
//! - `error`: Recovered-error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use trackside::analytics::AnalyticsEngine;
//! use trackside::api::http::create_router;
//! use trackside::api::websocket::{AppState, Broadcaster};
//! use trackside::event_log::{spawn_writer, EventLog, EventLogConfig};
//! use trackside::ingest::IngestPipeline;
//! use trackside::state::RaceStateStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = EventLogConfig::new("data");
//!     let writer = spawn_writer(EventLog::open(config.clone()).unwrap());
//!     let store = Arc::new(RaceStateStore::new());
//!     let broadcaster = Arc::new(Broadcaster::new(1024));
//!     let pipeline = Arc::new(IngestPipeline::new(
//!         Arc::clone(&store),
//!         writer,
//!         Arc::clone(&broadcaster),
//!     ));
//!     let analytics = Arc::new(AnalyticsEngine::new(config));
//!     let state = Arc::new(AppState::new(store, pipeline, analytics, broadcaster));
//!
//!     let app = create_router(state);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod event_log;
pub mod ingest;
pub mod normalizer;
pub mod state;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use analytics::AnalyticsEngine;
pub use config::ServerConfig;
pub use event_log::{EventLog, EventLogConfig};
pub use ingest::{IngestOutcome, IngestPipeline};
pub use normalizer::normalize;
pub use state::RaceStateStore;
pub use types::{
    CanonicalEvent, CarRecord, DriverState, DriverStatus, EventKind, RaceState, SessionState,
    SessionStatus, StateDelta, StoredEvent, TimingValue, TrackLayout,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
