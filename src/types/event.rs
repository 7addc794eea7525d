//! Canonical event types
//!
//! A `CanonicalEvent` is the normalized form of one ingested telemetry
//! payload. Controllers disagree on field names and nesting; the normalizer
//! resolves them into this one shape, and everything downstream (state
//! merge, persistence, analytics) speaks it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::timing::TimingValue;

/// What an ingested payload describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A driver completed a lap (or a sector split arrived)
    LapUpdate,
    /// Session-level change: mode, flags, running state
    SessionUpdate,
    /// Track layout metadata
    TrackUpdate,
    /// A car was announced to the registry
    CarRegistration,
    /// Recognized as telemetry but not as any known kind
    Unknown,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::LapUpdate => write!(f, "lap_update"),
            EventKind::SessionUpdate => write!(f, "session_update"),
            EventKind::TrackUpdate => write!(f, "track_update"),
            EventKind::CarRegistration => write!(f, "car_registration"),
            EventKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Session fields extracted from a SessionUpdate payload.
///
/// All fields optional: only what the payload carried is merged into
/// `SessionState` (merge-by-presence).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_running: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<TimingValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_laps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_lap: Option<u32>,
    /// The race webhook carries the track name alongside session fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_name: Option<String>,
}

impl SessionPatch {
    pub fn is_empty(&self) -> bool {
        self.session_type.is_none()
            && self.is_running.is_none()
            && self.flag_status.is_none()
            && self.total_time.is_none()
            && self.total_laps.is_none()
            && self.current_lap.is_none()
            && self.track_name.is_none()
    }
}

/// Car fields extracted from a CarRegistration payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    /// Color as the producer sent it; normalized to `#rrggbb` on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_analog: Option<String>,
}

/// Track fields extracted from a TrackUpdate payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
}

/// One normalized ingestion unit.
///
/// Invariant: `timestamp` and `kind` are always set (the normalizer stamps
/// receipt time when the payload has no usable timestamp), and timing
/// values are non-negative by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub kind: EventKind,

    /// Event time, epoch milliseconds
    #[serde(rename = "ts")]
    pub timestamp: i64,

    /// Stable driver identity; required for LapUpdate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lap_number: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lap_time: Option<TimingValue>,

    /// Sector splits 1..3; missing sectors stay `None`
    #[serde(default, skip_serializing_if = "sectors_all_none")]
    pub sector_times: [Option<TimingValue>; 3],

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_personal_best: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_status: Option<super::driver::DriverStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<TimingValue>,

    /// Kind-specific merge carriers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionPatch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car: Option<CarPatch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<TrackPatch>,

    /// The payload exactly as received, kept for audit and replay
    #[serde(default)]
    pub raw_payload: Value,
}

fn sectors_all_none(sectors: &[Option<TimingValue>; 3]) -> bool {
    sectors.iter().all(Option::is_none)
}

fn is_false(value: &bool) -> bool {
    !value
}

impl CanonicalEvent {
    /// An empty event of the given kind, stamped with the given time.
    pub fn empty(kind: EventKind, timestamp: i64, raw_payload: Value) -> Self {
        Self {
            kind,
            timestamp,
            driver_id: None,
            driver_name: None,
            car_id: None,
            lap_number: None,
            lap_time: None,
            sector_times: [None, None, None],
            is_personal_best: false,
            position: None,
            gap: None,
            driver_status: None,
            total_time: None,
            session: None,
            car: None,
            track: None,
            raw_payload,
        }
    }

    /// True when every sector split is present and well-formed.
    pub fn has_all_sectors(&self) -> bool {
        self.sector_times.iter().all(Option::is_some)
    }
}

/// One persisted row of the event log.
///
/// Rows are immutable once written: a server-assigned monotonic id, the
/// wall-clock ingestion time, and the canonical event itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Server-assigned, monotonically increasing
    pub id: u64,

    /// Wall-clock ingestion time, epoch milliseconds
    pub ingested_at: i64,

    #[serde(flatten)]
    pub event: CanonicalEvent,
}

impl StoredEvent {
    /// Serialize to one JSONL line.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from one JSONL line.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_kind_serialization() {
        let kind = EventKind::LapUpdate;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"lap_update\"");

        let parsed: EventKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, EventKind::LapUpdate);
    }

    #[test]
    fn test_stored_event_round_trip() {
        let mut event = CanonicalEvent::empty(
            EventKind::LapUpdate,
            1_700_000_000_000,
            json!({"controller_id": "3"}),
        );
        event.driver_id = Some("3".to_string());
        event.lap_time = TimingValue::parse_display("1:02.345");

        let stored = StoredEvent {
            id: 7,
            ingested_at: 1_700_000_000_123,
            event,
        };

        let line = stored.to_json_line().unwrap();
        assert!(line.contains("\"id\":7"));
        assert!(line.contains("\"kind\":\"lap_update\""));

        let parsed = StoredEvent::from_json_line(&line).unwrap();
        assert_eq!(parsed.id, 7);
        assert_eq!(parsed.event.driver_id.as_deref(), Some("3"));
        assert_eq!(parsed.event.lap_time.unwrap().raw_ms, 62_345);
    }

    #[test]
    fn test_empty_event_has_no_sectors() {
        let event = CanonicalEvent::empty(EventKind::Unknown, 0, Value::Null);
        assert!(!event.has_all_sectors());
        assert!(!event.is_personal_best);
    }
}
