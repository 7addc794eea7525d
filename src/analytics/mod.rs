//! Analytics query engine
//!
//! Read-only and stateless between calls: every query re-scans the
//! persisted event log, never the live race state, so analytics runs fully
//! independent of the ingestion path's locking. Only lap updates that
//! carry a lap time count as completed laps.

mod consistency;
mod sectors;
mod stats;

use std::collections::HashMap;

pub use consistency::{ConsistencyRow, TrendRow};
pub use sectors::{SectorRow, SectorStats};
pub use stats::DriverStats;

use crate::error::PersistError;
use crate::event_log::{EventLog, EventLogConfig, EventLogInfo};
use crate::types::{EventKind, StoredEvent, TimingValue};

/// Above this many completed laps, per-driver aggregation goes parallel.
const PARALLEL_SCAN_THRESHOLD: usize = 1000;

/// One completed lap as analytics sees it.
#[derive(Debug, Clone)]
pub(crate) struct CompletedLap {
    pub raw_ms: u64,
    /// Event time, used for ranking tie-breaks and window ordering
    pub timestamp: i64,
    pub sectors: [Option<TimingValue>; 3],
}

/// All completed laps of one driver, in log (arrival) order.
#[derive(Debug, Clone, Default)]
pub(crate) struct DriverLaps {
    pub name: Option<String>,
    pub laps: Vec<CompletedLap>,
}

impl DriverLaps {
    pub fn display_name(&self, driver_id: &str) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Driver {}", driver_id))
    }
}

/// Group the log's lap updates by driver.
pub(crate) fn laps_by_driver(rows: &[StoredEvent]) -> HashMap<String, DriverLaps> {
    let mut groups: HashMap<String, DriverLaps> = HashMap::new();

    for row in rows {
        if row.event.kind != EventKind::LapUpdate {
            continue;
        }
        let Some(driver_id) = row.event.driver_id.as_deref() else {
            continue;
        };
        let Some(lap_time) = &row.event.lap_time else {
            continue;
        };

        let group = groups.entry(driver_id.to_string()).or_default();
        if let Some(name) = &row.event.driver_name {
            group.name = Some(name.clone());
        }
        group.laps.push(CompletedLap {
            raw_ms: lap_time.raw_ms,
            timestamp: row.event.timestamp,
            sectors: row.event.sector_times.clone(),
        });
    }

    groups
}

pub(crate) fn mean_ms(laps: &[CompletedLap]) -> f64 {
    if laps.is_empty() {
        return 0.0;
    }
    laps.iter().map(|lap| lap.raw_ms as f64).sum::<f64>() / laps.len() as f64
}

/// The engine itself: a reader handle over the event log.
pub struct AnalyticsEngine {
    log: EventLog,
}

impl AnalyticsEngine {
    pub fn new(config: EventLogConfig) -> Self {
        Self {
            log: EventLog::with_config(config),
        }
    }

    /// Per-driver lap statistics, ranked by best lap (ties broken by who
    /// set the time first). Optionally narrowed to one driver.
    pub fn driver_stats(&self, driver: Option<&str>) -> Result<Vec<DriverStats>, PersistError> {
        let rows = match driver {
            Some(driver_id) => self.log.for_driver(driver_id)?,
            None => self.log.load()?,
        };
        Ok(stats::compute(&laps_by_driver(&rows), driver))
    }

    /// Consistency scores: population standard deviation of lap times as a
    /// percentage of the mean. Drivers with fewer than 3 laps are excluded.
    pub fn consistency(&self) -> Result<Vec<ConsistencyRow>, PersistError> {
        let rows = self.log.load()?;
        Ok(consistency::compute(&laps_by_driver(&rows)))
    }

    /// Lap-time trend per driver: mean of the first window minus mean of
    /// the last (positive = improving).
    pub fn lap_trend(&self, driver: Option<&str>) -> Result<Vec<TrendRow>, PersistError> {
        let rows = self.log.load()?;
        Ok(consistency::trend(&laps_by_driver(&rows), driver))
    }

    /// Sector averages and bests, over laps with all three sectors present.
    pub fn sector_performance(&self) -> Result<Vec<SectorRow>, PersistError> {
        let rows = self.log.load()?;
        Ok(sectors::compute(&laps_by_driver(&rows)))
    }

    /// Most recent persisted rows of any kind, newest first - the audit
    /// view over the raw log.
    pub fn recent_events(&self, limit: usize) -> Result<Vec<StoredEvent>, PersistError> {
        self.log.recent(limit)
    }

    /// Most recent persisted lap updates, newest first.
    pub fn recent_laps(&self, limit: usize) -> Result<Vec<StoredEvent>, PersistError> {
        let rows = self.log.load()?;
        let mut laps: Vec<StoredEvent> = rows
            .into_iter()
            .filter(|row| row.event.kind == EventKind::LapUpdate && row.event.lap_time.is_some())
            .collect();
        laps.reverse();
        laps.truncate(limit);
        Ok(laps)
    }

    /// Event-log summary for the ops endpoint.
    pub fn database_info(&self) -> Result<EventLogInfo, PersistError> {
        self.log.info()
    }
}

/// Run `compute` over every driver group, parallel above the scan
/// threshold.
pub(crate) fn aggregate_groups<R, F>(groups: &HashMap<String, DriverLaps>, compute: F) -> Vec<R>
where
    R: Send,
    F: Fn(&str, &DriverLaps) -> Option<R> + Sync,
{
    use rayon::prelude::*;

    let total_laps: usize = groups.values().map(|group| group.laps.len()).sum();

    if total_laps > PARALLEL_SCAN_THRESHOLD {
        groups
            .par_iter()
            .filter_map(|(driver_id, group)| compute(driver_id, group))
            .collect()
    } else {
        groups
            .iter()
            .filter_map(|(driver_id, group)| compute(driver_id, group))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use serde_json::json;

    use crate::types::CanonicalEvent;

    /// A stored lap row with explicit timing and timestamp.
    pub fn lap_row(id: u64, driver_id: &str, seconds: f64, timestamp: i64) -> StoredEvent {
        let mut event = CanonicalEvent::empty(EventKind::LapUpdate, timestamp, json!({}));
        event.driver_id = Some(driver_id.to_string());
        event.lap_time = TimingValue::from_seconds(seconds);
        StoredEvent {
            id,
            ingested_at: timestamp,
            event,
        }
    }

    #[test]
    fn test_grouping_skips_rows_without_lap_time() {
        let mut rows = vec![lap_row(1, "d1", 62.0, 1_000)];
        let mut no_time = CanonicalEvent::empty(EventKind::LapUpdate, 2_000, json!({}));
        no_time.driver_id = Some("d1".to_string());
        rows.push(StoredEvent {
            id: 2,
            ingested_at: 2_000,
            event: no_time,
        });

        let groups = laps_by_driver(&rows);
        assert_eq!(groups["d1"].laps.len(), 1);
    }
}
