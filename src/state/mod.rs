//! Race state store - the authoritative mutable snapshot
//!
//! One `RaceState` value behind a `parking_lot::RwLock`. All mutation goes
//! through `apply`, which holds the write lock for the whole merge, so the
//! store's invariants hold after every call and readers never observe a
//! half-applied event. Snapshot reads clone under the read lock and may
//! proceed concurrently with each other.

mod lap;
mod registry;
mod session;
mod track;

use parking_lot::RwLock;

use crate::types::{CanonicalEvent, EventKind, RaceState, StateDelta};

pub use registry::normalize_color;

/// Thread-safe owner of the live race state.
pub struct RaceStateStore {
    state: RwLock<RaceState>,
}

impl RaceStateStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RaceState::default()),
        }
    }

    /// Merge one canonical event, returning exactly what changed.
    ///
    /// Unknown event kinds produce an empty delta; the caller still
    /// persists them for audit.
    pub fn apply(&self, event: &CanonicalEvent) -> StateDelta {
        let mut state = self.state.write();
        let mut delta = StateDelta::default();

        match event.kind {
            EventKind::LapUpdate => lap::apply(&mut state, event, &mut delta),
            EventKind::SessionUpdate => session::apply(&mut state, event, &mut delta),
            EventKind::TrackUpdate => track::apply(&mut state, event, &mut delta),
            EventKind::CarRegistration => registry::apply(&mut state, event, &mut delta),
            EventKind::Unknown => {}
        }

        delta
    }

    /// Consistent point-in-time copy of the full state.
    pub fn snapshot(&self) -> RaceState {
        self.state.read().clone()
    }

    /// Explicit session reset back to defaults. External control surface;
    /// never triggered by ingested events.
    pub fn reset(&self) {
        *self.state.write() = RaceState::default();
    }
}

impl Default for RaceStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimingValue;
    use serde_json::Value;

    fn lap_event(driver_id: &str, lap: u32, seconds: f64) -> CanonicalEvent {
        let mut event = CanonicalEvent::empty(EventKind::LapUpdate, 1_000, Value::Null);
        event.driver_id = Some(driver_id.to_string());
        event.lap_number = Some(lap);
        event.lap_time = TimingValue::from_seconds(seconds);
        event
    }

    #[test]
    fn test_apply_reports_touched_driver() {
        let store = RaceStateStore::new();
        let delta = store.apply(&lap_event("d1", 1, 62.0));
        assert_eq!(delta.drivers_touched, vec!["d1".to_string()]);
        assert!(!delta.session_changed);
        assert!(!delta.car_registry_changed);
    }

    #[test]
    fn test_unknown_kind_yields_empty_delta() {
        let store = RaceStateStore::new();
        let event = CanonicalEvent::empty(EventKind::Unknown, 1_000, Value::Null);
        assert!(store.apply(&event).is_empty());
        assert!(store.snapshot().drivers.is_empty());
    }

    #[test]
    fn test_snapshot_is_isolated_copy() {
        let store = RaceStateStore::new();
        store.apply(&lap_event("d1", 1, 62.0));

        let snapshot = store.snapshot();
        store.apply(&lap_event("d1", 2, 61.0));

        // The earlier snapshot must not see the later apply.
        assert_eq!(snapshot.drivers["d1"].laps_completed, 1);
        assert_eq!(store.snapshot().drivers["d1"].laps_completed, 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let store = RaceStateStore::new();
        store.apply(&lap_event("d1", 1, 62.0));
        store.reset();
        assert!(store.snapshot().drivers.is_empty());
    }

    #[test]
    fn test_concurrent_appliers_serialize() {
        use std::sync::Arc;

        let store = Arc::new(RaceStateStore::new());
        let mut handles = Vec::new();

        for worker in 0..4u64 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for lap in 1..=25u32 {
                    let seconds = 60.0 + worker as f64 + lap as f64 / 1000.0;
                    store.apply(&lap_event(&format!("d{}", worker), lap, seconds));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.drivers.len(), 4);
        for worker in 0..4u64 {
            let driver = &snapshot.drivers[&format!("d{}", worker)];
            assert_eq!(driver.laps_completed, 25);
            // Best is the first lap of each worker's strictly increasing series.
            assert_eq!(
                driver.best_lap_time.as_ref().unwrap().raw_ms,
                60_001 + worker * 1_000
            );
        }
    }
}
