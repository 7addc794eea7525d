//! Consistency scores and lap-time trends

use std::collections::HashMap;

use serde::Serialize;

use crate::types::TimingValue;

use super::{aggregate_groups, mean_ms, DriverLaps};

/// Minimum completed laps before a consistency score means anything.
const CONSISTENCY_MIN_LAPS: usize = 3;

/// Trend window size: first N laps vs last N laps.
const TREND_WINDOW: usize = 5;

/// Minimum laps per window for a non-zero trend.
const TREND_MIN_WINDOW: usize = 3;

/// One driver's consistency score.
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyRow {
    pub driver_id: String,
    pub driver_name: String,
    pub total_laps: usize,
    pub average_lap: TimingValue,
    /// Population standard deviation of lap times, milliseconds
    pub std_dev_ms: f64,
    /// Standard deviation as a percentage of the mean; lower is steadier
    pub consistency_pct: f64,
}

pub(crate) fn compute(groups: &HashMap<String, DriverLaps>) -> Vec<ConsistencyRow> {
    let mut rows: Vec<ConsistencyRow> = aggregate_groups(groups, |driver_id, group| {
        if group.laps.len() < CONSISTENCY_MIN_LAPS {
            return None;
        }

        let mean = mean_ms(&group.laps);
        let variance = group
            .laps
            .iter()
            .map(|lap| {
                let diff = lap.raw_ms as f64 - mean;
                diff * diff
            })
            .sum::<f64>()
            / group.laps.len() as f64;
        let std_dev = variance.sqrt();

        Some(ConsistencyRow {
            driver_id: driver_id.to_string(),
            driver_name: group.display_name(driver_id),
            total_laps: group.laps.len(),
            average_lap: TimingValue::from_millis(mean.round() as u64),
            std_dev_ms: std_dev,
            consistency_pct: if mean > 0.0 { std_dev / mean * 100.0 } else { 0.0 },
        })
    });

    // Steadiest drivers first.
    rows.sort_by(|a, b| {
        a.consistency_pct
            .partial_cmp(&b.consistency_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}

/// One driver's lap-time progression.
#[derive(Debug, Clone, Serialize)]
pub struct TrendRow {
    pub driver_id: String,
    pub driver_name: String,
    pub total_laps: usize,
    /// Mean of the opening window, milliseconds
    pub first_window_ms: f64,
    /// Mean of the closing window, milliseconds
    pub last_window_ms: f64,
    /// first minus last; positive = lap times improving
    pub trend_ms: f64,
}

pub(crate) fn trend(groups: &HashMap<String, DriverLaps>, driver: Option<&str>) -> Vec<TrendRow> {
    let mut rows: Vec<TrendRow> = aggregate_groups(groups, |driver_id, group| {
        if let Some(wanted) = driver {
            if wanted != driver_id {
                return None;
            }
        }
        if group.laps.is_empty() {
            return None;
        }

        let window = TREND_WINDOW.min(group.laps.len());
        let first = &group.laps[..window];
        let last = &group.laps[group.laps.len() - window..];

        let (first_mean, last_mean) = (mean_ms(first), mean_ms(last));
        let trend_ms = if first.len() < TREND_MIN_WINDOW || last.len() < TREND_MIN_WINDOW {
            0.0
        } else {
            first_mean - last_mean
        };

        Some(TrendRow {
            driver_id: driver_id.to_string(),
            driver_name: group.display_name(driver_id),
            total_laps: group.laps.len(),
            first_window_ms: first_mean,
            last_window_ms: last_mean,
            trend_ms,
        })
    });

    rows.sort_by(|a, b| {
        b.trend_ms
            .partial_cmp(&a.trend_ms)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}
