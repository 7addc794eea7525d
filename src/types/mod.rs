//! Core data structures
//!
//! One file per aggregate: canonical events, driver/session/car/track state,
//! timing values and apply deltas.

mod car;
mod delta;
mod driver;
mod event;
mod session;
mod state;
mod timing;
mod track;

pub use car::CarRecord;
pub use delta::StateDelta;
pub use driver::{DriverState, DriverStatus, LapRecord};
pub use event::{
    CanonicalEvent, CarPatch, EventKind, SessionPatch, StoredEvent, TrackPatch,
};
pub use session::{SessionState, SessionStatus};
pub use state::{RaceState, LAP_HISTORY_CAP};
pub use timing::{format_millis, TimingValue};
pub use track::TrackLayout;
