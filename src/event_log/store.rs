//! Event log - append-only durable store for canonical events
//!
//! One JSON object per line in `events.jsonl`. Rows get a server-assigned
//! monotonic id and wall-clock ingestion timestamp and are immutable once
//! written. There are no update or delete operations. Reads re-open the
//! file per query, so analytics scans run concurrently with appends.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::PersistError;
use crate::types::{CanonicalEvent, EventKind, StoredEvent};
use crate::utils::now_millis;

/// Configuration for the event log.
#[derive(Debug, Clone)]
pub struct EventLogConfig {
    /// Path to the data directory
    pub data_dir: PathBuf,
}

impl EventLogConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Path to events.jsonl
    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join("events.jsonl")
    }
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self::new("data")
    }
}

/// The append-only event log.
pub struct EventLog {
    config: EventLogConfig,
    /// Next row id to assign
    next_id: u64,
}

impl EventLog {
    /// Log handle over an existing or empty directory without scanning.
    ///
    /// Read-only users (analytics) take this path; `next_id` is only
    /// meaningful for the appending side.
    pub fn with_config(config: EventLogConfig) -> Self {
        Self { config, next_id: 1 }
    }

    /// Open for appending: recovers the next id from what is on disk.
    pub fn open(config: EventLogConfig) -> Result<Self, PersistError> {
        let mut log = Self::with_config(config);
        let max_id = log.load()?.iter().map(|row| row.id).max().unwrap_or(0);
        log.next_id = max_id + 1;
        Ok(log)
    }

    pub fn config(&self) -> &EventLogConfig {
        &self.config
    }

    /// Append one canonical event, assigning its row id and ingestion time.
    ///
    /// Synced to disk before returning so an acknowledged row survives a
    /// crash.
    pub fn append(&mut self, event: CanonicalEvent) -> Result<StoredEvent, PersistError> {
        let events_path = self.config.events_path();

        if let Some(parent) = events_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let stored = StoredEvent {
            id: self.next_id,
            ingested_at: now_millis(),
            event,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&events_path)?;
        let json_line = stored.to_json_line()?;
        writeln!(file, "{}", json_line)?;
        file.sync_all()?;

        self.next_id += 1;
        Ok(stored)
    }

    /// Load every row in write order.
    ///
    /// Corrupt lines are skipped with a warning; one bad row must not take
    /// the history with it.
    pub fn load(&self) -> Result<Vec<StoredEvent>, PersistError> {
        let events_path = self.config.events_path();

        if !events_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&events_path)?;
        let reader = BufReader::new(file);
        let mut rows = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            match StoredEvent::from_json_line(&line) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!(line = line_num + 1, error = %e, "skipping unparseable event log line");
                }
            }
        }

        Ok(rows)
    }

    /// The most recent `limit` rows, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<StoredEvent>, PersistError> {
        let mut rows = self.load()?;
        rows.reverse();
        rows.truncate(limit);
        Ok(rows)
    }

    /// All rows referencing one driver, in write order.
    pub fn for_driver(&self, driver_id: &str) -> Result<Vec<StoredEvent>, PersistError> {
        let rows = self.load()?;
        Ok(rows
            .into_iter()
            .filter(|row| row.event.driver_id.as_deref() == Some(driver_id))
            .collect())
    }

    /// Aggregate facts about the log for the ops endpoint.
    pub fn info(&self) -> Result<EventLogInfo, PersistError> {
        let rows = self.load()?;

        let lap_events = rows
            .iter()
            .filter(|row| row.event.kind == EventKind::LapUpdate)
            .count();
        let unique_drivers = rows
            .iter()
            .filter_map(|row| row.event.driver_id.as_deref())
            .collect::<std::collections::HashSet<_>>()
            .len();

        let events_path = self.config.events_path();
        let file_size_bytes = std::fs::metadata(&events_path)
            .map(|meta| meta.len())
            .unwrap_or(0);

        Ok(EventLogInfo {
            total_events: rows.len(),
            lap_events,
            unique_drivers,
            first_event_at: rows.first().map(|row| row.ingested_at),
            last_event_at: rows.last().map(|row| row.ingested_at),
            file_size_bytes,
        })
    }
}

/// Summary statistics over the whole log.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EventLogInfo {
    pub total_events: usize,
    pub lap_events: usize,
    pub unique_drivers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_event_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event_at: Option<i64>,
    pub file_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimingValue;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_log() -> (EventLog, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = EventLogConfig::new(temp_dir.path());
        (EventLog::with_config(config), temp_dir)
    }

    fn lap_event(driver_id: &str, seconds: f64) -> CanonicalEvent {
        let mut event =
            CanonicalEvent::empty(EventKind::LapUpdate, 1_000, json!({"driver_id": driver_id}));
        event.driver_id = Some(driver_id.to_string());
        event.lap_time = TimingValue::from_seconds(seconds);
        event
    }

    #[test]
    fn test_append_assigns_monotonic_ids() {
        let (mut log, _temp_dir) = create_test_log();

        let first = log.append(lap_event("d1", 62.0)).unwrap();
        let second = log.append(lap_event("d2", 61.0)).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let rows = log.load().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].event.driver_id.as_deref(), Some("d1"));
    }

    #[test]
    fn test_open_recovers_next_id() {
        let temp_dir = TempDir::new().unwrap();
        let config = EventLogConfig::new(temp_dir.path());

        {
            let mut log = EventLog::with_config(config.clone());
            log.append(lap_event("d1", 62.0)).unwrap();
            log.append(lap_event("d1", 61.5)).unwrap();
        }

        let mut reopened = EventLog::open(config).unwrap();
        let row = reopened.append(lap_event("d1", 61.0)).unwrap();
        assert_eq!(row.id, 3);
    }

    #[test]
    fn test_load_skips_corrupt_lines() {
        let (mut log, temp_dir) = create_test_log();
        log.append(lap_event("d1", 62.0)).unwrap();

        // Corrupt the file by hand, then append another good row.
        let path = EventLogConfig::new(temp_dir.path()).events_path();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{not json at all").unwrap();

        log.append(lap_event("d2", 61.0)).unwrap();

        let rows = log.load().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].event.driver_id.as_deref(), Some("d2"));
    }

    #[test]
    fn test_recent_is_newest_first_and_bounded() {
        let (mut log, _temp_dir) = create_test_log();
        for i in 0..5 {
            log.append(lap_event(&format!("d{}", i), 62.0)).unwrap();
        }

        let rows = log.recent(3).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].event.driver_id.as_deref(), Some("d4"));
        assert_eq!(rows[2].event.driver_id.as_deref(), Some("d2"));
    }

    #[test]
    fn test_for_driver_filters() {
        let (mut log, _temp_dir) = create_test_log();
        log.append(lap_event("d1", 62.0)).unwrap();
        log.append(lap_event("d2", 61.0)).unwrap();
        log.append(lap_event("d1", 60.5)).unwrap();

        let rows = log.for_driver("d1").unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .all(|row| row.event.driver_id.as_deref() == Some("d1")));
    }

    #[test]
    fn test_info_counts() {
        let (mut log, _temp_dir) = create_test_log();
        log.append(lap_event("d1", 62.0)).unwrap();
        log.append(lap_event("d2", 61.0)).unwrap();
        log.append(CanonicalEvent::empty(EventKind::Unknown, 1_000, json!({})))
            .unwrap();

        let info = log.info().unwrap();
        assert_eq!(info.total_events, 3);
        assert_eq!(info.lap_events, 2);
        assert_eq!(info.unique_drivers, 2);
        assert!(info.file_size_bytes > 0);
        assert!(info.first_event_at.is_some());
    }

    #[test]
    fn test_empty_log_loads_empty() {
        let (log, _temp_dir) = create_test_log();
        assert!(log.load().unwrap().is_empty());
        assert_eq!(log.info().unwrap().total_events, 0);
    }
}
