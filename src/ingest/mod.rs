//! Ingestion pipeline
//!
//! One path for every inbound payload: normalize, merge into the race
//! state, hand to the log writer, fan out. The stages are independent
//! effects of one event - a persistence failure never rolls back the state
//! merge, and a normalization failure degrades to an "ignored" outcome
//! instead of an error. Nothing here blocks indefinitely or panics.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::api::websocket::{Broadcaster, PushKind};
use crate::error::IngestError;
use crate::event_log::LogWriterHandle;
use crate::normalizer::normalize_with_default;
use crate::state::RaceStateStore;
use crate::types::{EventKind, StateDelta};
use crate::utils::now_millis;

/// What happened to one ingested payload.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// The event merged into live state
    Applied { delta: StateDelta },
    /// The event was degraded or unrecognized; state untouched
    Ignored { reason: String },
}

/// The normalize → merge → persist → broadcast pipeline.
pub struct IngestPipeline {
    store: Arc<RaceStateStore>,
    log_writer: LogWriterHandle,
    broadcaster: Arc<Broadcaster>,
}

impl IngestPipeline {
    pub fn new(
        store: Arc<RaceStateStore>,
        log_writer: LogWriterHandle,
        broadcaster: Arc<Broadcaster>,
    ) -> Self {
        Self {
            store,
            log_writer,
            broadcaster,
        }
    }

    /// Ingest a race/session/lap/car payload.
    pub fn ingest(&self, raw: Value) -> Result<IngestOutcome, IngestError> {
        self.run(raw, None)
    }

    /// Ingest a track-layout payload (kind defaults to TrackUpdate when
    /// the payload carries no type key).
    pub fn ingest_track(&self, raw: Value) -> Result<IngestOutcome, IngestError> {
        self.run(raw, Some(EventKind::TrackUpdate))
    }

    fn run(
        &self,
        raw: Value,
        default_kind: Option<EventKind>,
    ) -> Result<IngestOutcome, IngestError> {
        let received_at = now_millis();

        let event = match normalize_with_default(&raw, received_at, default_kind) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "payload could not be normalized; ignoring");
                return Ok(IngestOutcome::Ignored {
                    reason: e.to_string(),
                });
            }
        };
        let kind = event.kind;

        let delta = self.store.apply(&event);

        // Unknown kinds are persisted too: the log is the audit trail.
        self.log_writer.submit(event);

        if !delta.is_empty() {
            let snapshot = self.store.snapshot();
            for push_kind in push_kinds(&delta) {
                self.broadcaster.publish(push_kind, snapshot.clone());
            }
        }

        if kind == EventKind::Unknown {
            Ok(IngestOutcome::Ignored {
                reason: "unknown event kind".to_string(),
            })
        } else {
            Ok(IngestOutcome::Applied { delta })
        }
    }
}

/// Map a delta onto the push kinds viewers subscribe to.
fn push_kinds(delta: &StateDelta) -> Vec<PushKind> {
    let mut kinds = Vec::new();
    if !delta.drivers_touched.is_empty() || delta.session_changed {
        kinds.push(PushKind::RaceUpdate);
    }
    if delta.track_changed {
        kinds.push(PushKind::TrackUpdate);
    }
    if delta.car_registry_changed {
        kinds.push(PushKind::CarDatabaseUpdate);
    }
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::{spawn_writer, EventLog, EventLogConfig};
    use serde_json::json;
    use tempfile::TempDir;

    fn pipeline_with_temp_log() -> (IngestPipeline, Arc<Broadcaster>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = EventLogConfig::new(temp_dir.path());
        let writer = spawn_writer(EventLog::with_config(config));
        let store = Arc::new(RaceStateStore::new());
        let broadcaster = Arc::new(Broadcaster::new(64));
        let pipeline = IngestPipeline::new(store, writer, Arc::clone(&broadcaster));
        (pipeline, broadcaster, temp_dir)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_lap_payload_applies_and_broadcasts() {
        let (pipeline, broadcaster, _temp_dir) = pipeline_with_temp_log();
        let mut rx = broadcaster.subscribe();

        let outcome = pipeline
            .ingest(json!({
                "event_type": "lap_update",
                "driver_id": "d1",
                "lap": 3,
                "lap_time": 62.4
            }))
            .unwrap();

        match outcome {
            IngestOutcome::Applied { delta } => {
                assert_eq!(delta.drivers_touched, vec!["d1".to_string()]);
            }
            IngestOutcome::Ignored { reason } => panic!("unexpected ignore: {}", reason),
        }

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.kind, PushKind::RaceUpdate);
        assert_eq!(msg.snapshot.drivers["d1"].laps_completed, 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_driver_id_is_ignored_not_error() {
        let (pipeline, _broadcaster, _temp_dir) = pipeline_with_temp_log();

        // Lap update without any driver id alias.
        let outcome = pipeline
            .ingest(json!({"event_type": "lap_update", "lap_time": 62.4}))
            .unwrap();
        assert!(matches!(outcome, IngestOutcome::Ignored { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unknown_kind_persisted_but_no_push() {
        let (pipeline, broadcaster, temp_dir) = pipeline_with_temp_log();
        let mut rx = broadcaster.subscribe();

        let outcome = pipeline
            .ingest(json!({"event_type": "firmware_ping", "x": 1}))
            .unwrap();
        assert!(matches!(outcome, IngestOutcome::Ignored { .. }));
        assert!(rx.try_recv().is_err());

        // The audit row still lands in the log.
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        let rows = EventLog::with_config(EventLogConfig::new(temp_dir.path()))
            .load()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event.kind, EventKind::Unknown);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_track_endpoint_defaults_kind() {
        let (pipeline, broadcaster, _temp_dir) = pipeline_with_temp_log();
        let mut rx = broadcaster.subscribe();

        let outcome = pipeline
            .ingest_track(json!({"name": "Club Circuit", "length": 18.5}))
            .unwrap();
        assert!(matches!(outcome, IngestOutcome::Applied { .. }));

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.kind, PushKind::TrackUpdate);
        assert_eq!(msg.snapshot.track.name, "Club Circuit");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_car_registration_pushes_car_database_update() {
        let (pipeline, broadcaster, _temp_dir) = pipeline_with_temp_log();
        let mut rx = broadcaster.subscribe();

        pipeline
            .ingest(json!({
                "event_type": "ui.car_database_update",
                "car_data": {"id": 2, "name": "Audi R8", "color": "rgb(30,65,255)"}
            }))
            .unwrap();

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.kind, PushKind::CarDatabaseUpdate);
        assert_eq!(msg.snapshot.cars["2"].color, "#1e41ff");
    }
}
