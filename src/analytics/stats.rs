//! Per-driver lap statistics and ranking

use std::collections::HashMap;

use serde::Serialize;

use crate::types::TimingValue;

use super::{aggregate_groups, mean_ms, DriverLaps};

/// One ranked row of the driver statistics table.
#[derive(Debug, Clone, Serialize)]
pub struct DriverStats {
    pub driver_id: String,
    pub driver_name: String,
    pub total_laps: usize,
    pub best_lap: TimingValue,
    /// When the best lap was set, epoch milliseconds
    pub best_lap_at: i64,
    pub average_lap: TimingValue,
    /// When the most recent lap arrived
    pub last_lap_at: i64,
}

pub(crate) fn compute(
    groups: &HashMap<String, DriverLaps>,
    driver: Option<&str>,
) -> Vec<DriverStats> {
    let mut rows: Vec<DriverStats> = aggregate_groups(groups, |driver_id, group| {
        if let Some(wanted) = driver {
            if wanted != driver_id {
                return None;
            }
        }
        if group.laps.is_empty() {
            return None;
        }

        // Earliest occurrence of the minimum raw time wins the tie-break.
        let mut best_ms = u64::MAX;
        let mut best_at = i64::MAX;
        for lap in &group.laps {
            if lap.raw_ms < best_ms || (lap.raw_ms == best_ms && lap.timestamp < best_at) {
                best_ms = lap.raw_ms;
                best_at = lap.timestamp;
            }
        }

        let last_lap_at = group
            .laps
            .iter()
            .map(|lap| lap.timestamp)
            .max()
            .unwrap_or_default();

        Some(DriverStats {
            driver_id: driver_id.to_string(),
            driver_name: group.display_name(driver_id),
            total_laps: group.laps.len(),
            best_lap: TimingValue::from_millis(best_ms),
            best_lap_at: best_at,
            average_lap: TimingValue::from_millis(mean_ms(&group.laps).round() as u64),
            last_lap_at,
        })
    });

    rows.sort_by(|a, b| {
        a.best_lap
            .raw_ms
            .cmp(&b.best_lap.raw_ms)
            .then(a.best_lap_at.cmp(&b.best_lap_at))
    });
    rows
}
