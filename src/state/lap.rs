//! Lap update merge
//!
//! Merge-by-presence: only fields the event carries overwrite driver
//! state. A lap time that differs from the previous one appends to the
//! driver's history ring (cap 50, oldest out first) and challenges the
//! best lap.

use crate::types::{
    CanonicalEvent, DriverState, LapRecord, RaceState, StateDelta, LAP_HISTORY_CAP,
};

pub fn apply(state: &mut RaceState, event: &CanonicalEvent, delta: &mut StateDelta) {
    let Some(driver_id) = event.driver_id.as_deref() else {
        // Normalization guarantees a driver id for lap updates; anything
        // else reaching here is a no-op.
        return;
    };

    let driver = state
        .drivers
        .entry(driver_id.to_string())
        .or_insert_with(|| DriverState::new(driver_id.to_string()));

    if let Some(name) = &event.driver_name {
        driver.name = name.clone();
    }
    if let Some(car_id) = &event.car_id {
        driver.car_id = Some(car_id.clone());
    }
    if let Some(lap_number) = event.lap_number {
        driver.laps_completed = lap_number;
    }
    if let Some(position) = event.position {
        driver.position = Some(position);
    }
    if let Some(gap) = &event.gap {
        driver.gap = Some(gap.clone());
    }
    if let Some(status) = event.driver_status {
        driver.status = status;
    }
    if let Some(total_time) = &event.total_time {
        driver.total_time = Some(total_time.clone());
    }

    let sectors: Vec<_> = event.sector_times.iter().flatten().cloned().collect();
    if !sectors.is_empty() {
        driver.sector_times = sectors;
    }

    if let Some(lap_time) = &event.lap_time {
        let changed = driver
            .last_lap_time
            .as_ref()
            .map(|prev| prev.raw_ms)
            != Some(lap_time.raw_ms);
        driver.last_lap_time = Some(lap_time.clone());

        if changed {
            let ring = state.lap_history.entry(driver_id.to_string()).or_default();
            ring.push_back(LapRecord {
                lap_number: event.lap_number,
                lap_time: lap_time.clone(),
                timestamp: event.timestamp,
                is_personal_best: event.is_personal_best,
            });
            while ring.len() > LAP_HISTORY_CAP {
                ring.pop_front();
            }

            let is_best = driver
                .best_lap_time
                .as_ref()
                .map_or(true, |best| lap_time.raw_ms < best.raw_ms);
            if is_best {
                driver.best_lap_time = Some(lap_time.clone());
            }
        }
    }

    delta.touch_driver(driver_id);
}
