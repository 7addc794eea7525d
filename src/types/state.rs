//! The full race state aggregate
//!
//! A snapshot is a clone of this value taken under the store's read lock.
//! It is what new subscribers receive on connect and what every fanout push
//! carries.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use super::car::CarRecord;
use super::driver::{DriverState, LapRecord};
use super::session::SessionState;
use super::track::TrackLayout;

/// Per-driver lap history cap. Oldest laps are evicted first on overflow.
pub const LAP_HISTORY_CAP: usize = 50;

/// Everything a viewer needs: session, track, drivers, car registry and
/// recent lap history.
///
/// Driver and car maps are unbounded on purpose: cardinality is bounded by
/// physical race entrants, not by event volume. Lap history is the only
/// per-event growth path, and it is ring-capped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceState {
    pub session: SessionState,
    pub track: TrackLayout,
    pub drivers: HashMap<String, DriverState>,
    pub cars: HashMap<String, CarRecord>,
    /// driver_id → recent laps, newest last, capped at `LAP_HISTORY_CAP`
    pub lap_history: HashMap<String, VecDeque<LapRecord>>,
}
