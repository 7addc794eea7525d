//! Shared application state for the HTTP and WebSocket layers

use std::sync::Arc;

use crate::analytics::AnalyticsEngine;
use crate::ingest::IngestPipeline;
use crate::state::RaceStateStore;

use super::broadcaster::Broadcaster;

/// Everything a request handler can reach, injected once at startup.
pub struct AppState {
    /// The live race state
    pub store: Arc<RaceStateStore>,

    /// Webhook ingestion pipeline
    pub pipeline: Arc<IngestPipeline>,

    /// Read-only queries over the event log
    pub analytics: Arc<AnalyticsEngine>,

    /// Live push fanout
    pub broadcaster: Arc<Broadcaster>,
}

impl AppState {
    pub fn new(
        store: Arc<RaceStateStore>,
        pipeline: Arc<IngestPipeline>,
        analytics: Arc<AnalyticsEngine>,
        broadcaster: Arc<Broadcaster>,
    ) -> Self {
        Self {
            store,
            pipeline,
            analytics,
            broadcaster,
        }
    }
}
