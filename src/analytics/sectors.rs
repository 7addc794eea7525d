//! Sector performance

use std::collections::HashMap;

use serde::Serialize;

use crate::types::TimingValue;

use super::{aggregate_groups, DriverLaps};

/// Average and best for one sector.
#[derive(Debug, Clone, Serialize)]
pub struct SectorStats {
    pub sector: usize,
    pub average: TimingValue,
    pub best: TimingValue,
}

/// One driver's sector breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct SectorRow {
    pub driver_id: String,
    pub driver_name: String,
    /// Laps that carried all three sectors; the aggregation denominator
    pub laps_counted: usize,
    pub sectors: Vec<SectorStats>,
}

pub(crate) fn compute(groups: &HashMap<String, DriverLaps>) -> Vec<SectorRow> {
    let mut rows: Vec<SectorRow> = aggregate_groups(groups, |driver_id, group| {
        // Only laps with every sector present count; a missing sector is
        // excluded from the denominator, not treated as zero.
        let complete: Vec<_> = group
            .laps
            .iter()
            .filter(|lap| lap.sectors.iter().all(Option::is_some))
            .collect();

        if complete.is_empty() {
            return None;
        }

        let sectors = (0..3)
            .map(|index| {
                let values: Vec<u64> = complete
                    .iter()
                    .map(|lap| lap.sectors[index].as_ref().map(|t| t.raw_ms).unwrap_or(0))
                    .collect();
                let sum: u64 = values.iter().sum();
                let best = values.iter().copied().min().unwrap_or(0);
                SectorStats {
                    sector: index + 1,
                    average: TimingValue::from_millis(
                        (sum as f64 / values.len() as f64).round() as u64
                    ),
                    best: TimingValue::from_millis(best),
                }
            })
            .collect();

        Some(SectorRow {
            driver_id: driver_id.to_string(),
            driver_name: group.display_name(driver_id),
            laps_counted: complete.len(),
            sectors,
        })
    });

    rows.sort_by(|a, b| a.driver_id.cmp(&b.driver_id));
    rows
}

#[cfg(test)]
mod tests {
    use super::super::{laps_by_driver, test_support::lap_row};
    use super::*;
    use crate::types::StoredEvent;

    fn with_sectors(mut row: StoredEvent, sectors: [f64; 3]) -> StoredEvent {
        row.event.sector_times = [
            TimingValue::from_seconds(sectors[0]),
            TimingValue::from_seconds(sectors[1]),
            TimingValue::from_seconds(sectors[2]),
        ];
        row
    }

    #[test]
    fn test_incomplete_sector_rows_excluded_from_denominator() {
        let rows = vec![
            with_sectors(lap_row(1, "d1", 62.0, 1_000), [20.0, 21.0, 21.0]),
            // Missing sectors: must not drag the averages down.
            lap_row(2, "d1", 61.0, 2_000),
            with_sectors(lap_row(3, "d1", 63.0, 3_000), [22.0, 21.0, 20.0]),
        ];

        let result = compute(&laps_by_driver(&rows));
        let row = &result[0];
        assert_eq!(row.laps_counted, 2);
        assert_eq!(row.sectors[0].average.raw_ms, 21_000);
        assert_eq!(row.sectors[0].best.raw_ms, 20_000);
        assert_eq!(row.sectors[2].best.raw_ms, 20_000);
    }

    #[test]
    fn test_driver_without_complete_sectors_omitted() {
        let rows = vec![lap_row(1, "d1", 62.0, 1_000)];
        assert!(compute(&laps_by_driver(&rows)).is_empty());
    }
}
