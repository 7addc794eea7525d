//! Driver state derived from lap updates

use serde::{Deserialize, Serialize};

use super::timing::TimingValue;

/// Where a driver is in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    #[default]
    Unknown,
    Running,
    Finished,
    Retired,
}

impl DriverStatus {
    /// Map producer status vocabulary onto the enum. Unrecognized values
    /// yield `None` so the prior status is left untouched.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "running" | "active" | "racing" => Some(DriverStatus::Running),
            "finished" | "done" => Some(DriverStatus::Finished),
            "retired" | "dnf" | "out" => Some(DriverStatus::Retired),
            _ => None,
        }
    }
}

/// Mutable per-driver snapshot, owned by the race state store.
///
/// Created lazily on the first event referencing an unseen driver id and
/// never deleted during a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverState {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    pub laps_completed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_lap_time: Option<TimingValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_lap_time: Option<TimingValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<TimingValue>,
    /// Most recent sector splits, in sector order
    pub sector_times: Vec<TimingValue>,
    /// Gap to the leader as the controller reports it ("+2.450", "+1 lap")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    pub status: DriverStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_id: Option<String>,
}

impl DriverState {
    /// Fresh state for a driver seen for the first time.
    pub fn new(id: String) -> Self {
        let name = format!("Driver {}", id);
        Self {
            id,
            name,
            position: None,
            laps_completed: 0,
            best_lap_time: None,
            last_lap_time: None,
            total_time: None,
            sector_times: Vec::new(),
            gap: None,
            status: DriverStatus::Unknown,
            car_id: None,
        }
    }
}

/// One completed lap in a driver's history ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lap_number: Option<u32>,
    pub lap_time: TimingValue,
    /// Event time, epoch milliseconds
    pub timestamp: i64,
    #[serde(default)]
    pub is_personal_best: bool,
}
