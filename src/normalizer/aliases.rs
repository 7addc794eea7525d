//! Field alias tables
//!
//! Producers name the same field differently: the SmartRace controller
//! nests lap data under `event_data` with `driver_data`/`car_data` blocks,
//! dashboard-style senders use flat camelCase, and hand-rolled relays use
//! snake_case. Each canonical field has one ordered list of candidate
//! paths; the first present alias wins. Paths are dotted to reach into
//! nested objects. Explicit tables, no reflection.

use serde_json::Value;

/// Key that names the event kind.
pub const EVENT_TYPE: &[&str] = &["event_type", "eventType", "event_kind", "eventKind", "type", "kind"];

/// Event timestamp (seconds or millis, disambiguated by magnitude).
pub const TIMESTAMP: &[&str] = &["time", "timestamp", "ts"];

pub const DRIVER_ID: &[&str] = &[
    "driver_id",
    "driverId",
    "controller_id",
    "controllerId",
    "event_data.controller_id",
    "event_data.driver_data.id",
    "driver_data.id",
];

pub const DRIVER_NAME: &[&str] = &[
    "driver_name",
    "driverName",
    "event_data.driver_data.name",
    "driver_data.name",
];

pub const CAR_ID: &[&str] = &["car_id", "carId", "event_data.car_data.id", "car_data.id"];

pub const LAP_NUMBER: &[&str] = &["lap", "lap_number", "lapNumber", "laps", "event_data.lap"];

/// Raw milliseconds; wins over the display form when both are present.
pub const LAP_TIME_RAW: &[&str] = &[
    "laptime_raw",
    "laptimeRaw",
    "lap_time_raw",
    "event_data.laptime_raw",
];

pub const LAP_TIME: &[&str] = &[
    "laptime",
    "lap_time",
    "lapTime",
    "lastLapTime",
    "last_lap_time",
    "event_data.laptime",
];

pub const SECTOR_1: &[&str] = &["sector_1", "sector1", "event_data.sector_1"];
pub const SECTOR_2: &[&str] = &["sector_2", "sector2", "event_data.sector_2"];
pub const SECTOR_3: &[&str] = &["sector_3", "sector3", "event_data.sector_3"];

/// Some producers send sectors as one array instead of discrete fields.
pub const SECTOR_ARRAY: &[&str] = &["sector_times", "sectorTimes", "event_data.sector_times"];

pub const LAP_PB: &[&str] = &[
    "lap_pb",
    "lapPb",
    "is_personal_best",
    "isPersonalBest",
    "event_data.lap_pb",
];

pub const POSITION: &[&str] = &["position", "pos", "event_data.position"];

pub const GAP: &[&str] = &["gap", "gap_to_leader", "gapToLeader", "event_data.gap"];

pub const DRIVER_STATUS: &[&str] = &[
    "driver_status",
    "driverStatus",
    "status",
    "event_data.status",
];

pub const TOTAL_TIME: &[&str] = &["total_time", "totalTime", "event_data.total_time"];

pub const SESSION_TYPE: &[&str] = &["race_mode", "raceMode", "session_type", "sessionType", "mode"];

pub const SESSION_RUNNING: &[&str] = &["is_race_active", "isRaceActive", "is_running", "isRunning"];

pub const SESSION_FLAG: &[&str] = &["flag_status", "flagStatus", "flag"];

pub const SESSION_TIME: &[&str] = &["race_time", "raceTime", "session_time", "event_data.race_time"];

pub const SESSION_TOTAL_LAPS: &[&str] = &["total_laps", "totalLaps"];

pub const SESSION_CURRENT_LAP: &[&str] = &["current_lap", "currentLap"];

pub const SESSION_TRACK_NAME: &[&str] = &["track_name", "trackName"];

pub const CAR_NAME: &[&str] = &[
    "car_name",
    "carName",
    "event_data.car_data.name",
    "car_data.name",
    "name",
];

pub const CAR_MANUFACTURER: &[&str] = &[
    "manufacturer",
    "car_manufacturer",
    "event_data.car_data.manufacturer",
    "car_data.manufacturer",
];

pub const CAR_SCALE: &[&str] = &["scale", "event_data.car_data.scale", "car_data.scale"];

pub const CAR_COLOR: &[&str] = &["color", "car_color", "event_data.car_data.color", "car_data.color"];

pub const CAR_DIGITAL: &[&str] = &[
    "digital_analog",
    "digitalAnalog",
    "event_data.car_data.digital_analog",
    "car_data.digital_analog",
];

pub const TRACK_NAME: &[&str] = &[
    "track_name",
    "trackName",
    "track_data.name",
    "event_data.track_name",
    "name",
];

pub const TRACK_LENGTH: &[&str] = &["length", "track_length", "trackLength", "track_data.length"];

pub const TRACK_SECTORS: &[&str] = &["sectors", "sector_count", "sectorCount", "track_data.sectors"];

pub const TRACK_LAYOUT: &[&str] = &["layout", "layout_id", "layoutId", "track_data.layout"];

/// Resolve the first present alias against a payload.
///
/// Dotted segments descend into nested objects. JSON `null` counts as
/// absent so a later alias can still win.
pub fn lookup<'a>(root: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    for path in paths {
        let mut current = root;
        let mut found = true;
        for segment in path.split('.') {
            match current.get(segment) {
                Some(next) => current = next,
                None => {
                    found = false;
                    break;
                }
            }
        }
        if found && !current.is_null() {
            return Some(current);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_prefers_earlier_alias() {
        let payload = json!({"driver_id": "top", "event_data": {"controller_id": "nested"}});
        let value = lookup(&payload, DRIVER_ID).unwrap();
        assert_eq!(value, "top");
    }

    #[test]
    fn test_lookup_descends_dotted_paths() {
        let payload = json!({"event_data": {"driver_data": {"id": 5}}});
        let value = lookup(&payload, DRIVER_ID).unwrap();
        assert_eq!(value, 5);
    }

    #[test]
    fn test_lookup_skips_nulls() {
        let payload = json!({"driver_id": null, "controller_id": "3"});
        let value = lookup(&payload, DRIVER_ID).unwrap();
        assert_eq!(value, "3");
    }

    #[test]
    fn test_lookup_absent() {
        let payload = json!({"unrelated": true});
        assert!(lookup(&payload, DRIVER_ID).is_none());
    }
}
