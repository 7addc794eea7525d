//! Background log writer
//!
//! Persistence is fire-and-forget from the ingestion path: events go into
//! a bounded channel and a single blocking-thread consumer appends them in
//! arrival order (which preserves per-driver order). A full queue or a
//! failed append is a warning, never a block and never a rollback of the
//! state merge that already happened.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::types::CanonicalEvent;

use super::store::EventLog;

/// Queue capacity between ingestion and the writer thread.
pub const WRITER_QUEUE_CAPACITY: usize = 1024;

/// Handle for submitting events to the writer task.
#[derive(Clone)]
pub struct LogWriterHandle {
    tx: mpsc::Sender<CanonicalEvent>,
}

impl LogWriterHandle {
    /// Submit an event for appending. Never blocks; on a full queue or a
    /// stopped writer the event is dropped from the durable log (not from
    /// live state) with a warning.
    pub fn submit(&self, event: CanonicalEvent) {
        if let Err(e) = self.tx.try_send(event) {
            warn!(error = %e, "event log queue rejected event; continuing without persistence");
        }
    }
}

/// Spawn the writer on a blocking thread and return its submit handle.
pub fn spawn_writer(mut log: EventLog) -> LogWriterHandle {
    let (tx, mut rx) = mpsc::channel::<CanonicalEvent>(WRITER_QUEUE_CAPACITY);

    tokio::task::spawn_blocking(move || {
        while let Some(event) = rx.blocking_recv() {
            match log.append(event) {
                Ok(row) => debug!(id = row.id, kind = %row.event.kind, "event persisted"),
                Err(e) => warn!(error = %e, "event log append failed; event not persisted"),
            }
        }
        debug!("event log writer stopped");
    });

    LogWriterHandle { tx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::EventLogConfig;
    use crate::types::EventKind;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_writer_appends_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let config = EventLogConfig::new(temp_dir.path());
        let handle = spawn_writer(EventLog::with_config(config.clone()));

        for i in 0..10 {
            let mut event =
                CanonicalEvent::empty(EventKind::LapUpdate, i, json!({"lap": i}));
            event.driver_id = Some("d1".to_string());
            event.lap_number = Some(i as u32);
            handle.submit(event);
        }

        // Give the blocking writer a moment to drain the queue.
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let rows = EventLog::with_config(config).load().unwrap();
        assert_eq!(rows.len(), 10);
        let laps: Vec<_> = rows.iter().map(|row| row.event.lap_number).collect();
        assert_eq!(laps, (0..10).map(|i| Some(i as u32)).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_submit_after_writer_gone_is_nonfatal() {
        let (tx, rx) = mpsc::channel::<CanonicalEvent>(1);
        drop(rx);
        let handle = LogWriterHandle { tx };

        // Must not panic or block.
        handle.submit(CanonicalEvent::empty(EventKind::Unknown, 0, json!({})));
    }
}
