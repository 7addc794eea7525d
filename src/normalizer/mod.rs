//! Event normalizer
//!
//! Turns a loosely-structured webhook payload into one `CanonicalEvent`.
//! Pure apart from the caller-supplied receipt timestamp: same payload in,
//! same event out. Required fields missing yield a `NormalizationError`;
//! optional fields of the wrong type are coerced or dropped, never fatal.

mod aliases;
mod coerce;

use serde_json::Value;

use crate::error::NormalizationError;
use crate::types::{CanonicalEvent, CarPatch, EventKind, SessionPatch, TrackPatch};
use crate::utils::to_epoch_millis;

use aliases::lookup;
use coerce::{as_bool, as_f64, as_i64, as_id, as_string, as_timing, as_timing_raw, as_u32};

/// Normalize one raw payload received at `received_at_ms`.
pub fn normalize(raw: &Value, received_at_ms: i64) -> Result<CanonicalEvent, NormalizationError> {
    normalize_with_default(raw, received_at_ms, None)
}

/// Normalize with a fallback kind for endpoints that already know what
/// they receive (the track webhook). An explicit type key in the payload
/// still wins.
pub fn normalize_with_default(
    raw: &Value,
    received_at_ms: i64,
    default_kind: Option<EventKind>,
) -> Result<CanonicalEvent, NormalizationError> {
    let kind = match (lookup(raw, aliases::EVENT_TYPE), default_kind) {
        (None, Some(default)) => default,
        _ => detect_kind(raw),
    };

    let timestamp = lookup(raw, aliases::TIMESTAMP)
        .and_then(as_i64)
        .map(to_epoch_millis)
        .unwrap_or(received_at_ms);

    let mut event = CanonicalEvent::empty(kind, timestamp, raw.clone());

    event.driver_id = lookup(raw, aliases::DRIVER_ID).and_then(as_id);
    event.driver_name = lookup(raw, aliases::DRIVER_NAME).and_then(as_string);
    event.car_id = lookup(raw, aliases::CAR_ID).and_then(as_id);
    event.lap_number = lookup(raw, aliases::LAP_NUMBER).and_then(as_u32);
    event.lap_time = extract_lap_time(raw);
    event.sector_times = extract_sectors(raw);
    event.is_personal_best = lookup(raw, aliases::LAP_PB).and_then(as_bool).unwrap_or(false);
    event.position = lookup(raw, aliases::POSITION).and_then(as_u32);
    event.gap = lookup(raw, aliases::GAP).and_then(as_string);
    event.driver_status = lookup(raw, aliases::DRIVER_STATUS)
        .and_then(Value::as_str)
        .and_then(crate::types::DriverStatus::parse);
    event.total_time = lookup(raw, aliases::TOTAL_TIME).and_then(|v| as_timing("total_time", v));

    match kind {
        EventKind::LapUpdate => {
            if event.driver_id.is_none() {
                return Err(NormalizationError::MissingField("driver_id"));
            }
        }
        EventKind::SessionUpdate => {
            event.session = Some(extract_session(raw));
        }
        EventKind::TrackUpdate => {
            event.track = Some(extract_track(raw));
        }
        EventKind::CarRegistration => {
            if event.car_id.is_none() {
                return Err(NormalizationError::MissingField("car_id"));
            }
            event.car = Some(extract_car(raw));
        }
        EventKind::Unknown => {}
    }

    Ok(event)
}

/// Decide the event kind.
///
/// An explicit type key wins, matched by substring against the producer
/// vocabularies we have seen (`ui.lap_update`, `LapUpdate`,
/// `car_database_update`, ...). Without one, fall back to field presence.
fn detect_kind(raw: &Value) -> EventKind {
    if let Some(type_value) = lookup(raw, aliases::EVENT_TYPE) {
        if let Some(name) = type_value.as_str() {
            let name = name.to_ascii_lowercase();
            return if name.contains("lap") {
                EventKind::LapUpdate
            } else if name.contains("track") {
                EventKind::TrackUpdate
            } else if name.contains("car") {
                EventKind::CarRegistration
            } else if name.contains("session") || name.contains("race") || name.contains("status") {
                EventKind::SessionUpdate
            } else {
                EventKind::Unknown
            };
        }
        return EventKind::Unknown;
    }

    // No type key: infer from what the payload carries.
    let has_lap_fields = lookup(raw, aliases::LAP_TIME_RAW).is_some()
        || lookup(raw, aliases::LAP_TIME).is_some()
        || lookup(raw, aliases::LAP_NUMBER).is_some();
    if has_lap_fields && lookup(raw, aliases::DRIVER_ID).is_some() {
        return EventKind::LapUpdate;
    }

    let has_car_fields = lookup(raw, aliases::CAR_COLOR).is_some()
        || lookup(raw, aliases::CAR_MANUFACTURER).is_some();
    if has_car_fields && lookup(raw, aliases::CAR_ID).is_some() {
        return EventKind::CarRegistration;
    }

    let has_session_fields = lookup(raw, aliases::SESSION_RUNNING).is_some()
        || lookup(raw, aliases::SESSION_TYPE).is_some()
        || lookup(raw, aliases::SESSION_TIME).is_some()
        || lookup(raw, aliases::SESSION_TOTAL_LAPS).is_some();
    if has_session_fields {
        return EventKind::SessionUpdate;
    }

    if lookup(raw, aliases::TRACK_LENGTH).is_some() || lookup(raw, aliases::TRACK_LAYOUT).is_some() {
        return EventKind::TrackUpdate;
    }

    EventKind::Unknown
}

fn extract_lap_time(raw: &Value) -> Option<crate::types::TimingValue> {
    // Raw milliseconds are authoritative when both encodings are present.
    if let Some(value) = lookup(raw, aliases::LAP_TIME_RAW) {
        if let Some(timing) = as_timing_raw("laptime_raw", value) {
            return Some(timing);
        }
    }
    lookup(raw, aliases::LAP_TIME).and_then(|v| as_timing("lap_time", v))
}

fn extract_sectors(raw: &Value) -> [Option<crate::types::TimingValue>; 3] {
    let mut sectors = [
        lookup(raw, aliases::SECTOR_1).and_then(|v| as_timing("sector_1", v)),
        lookup(raw, aliases::SECTOR_2).and_then(|v| as_timing("sector_2", v)),
        lookup(raw, aliases::SECTOR_3).and_then(|v| as_timing("sector_3", v)),
    ];

    if sectors.iter().all(Option::is_none) {
        if let Some(Value::Array(values)) = lookup(raw, aliases::SECTOR_ARRAY) {
            for (slot, value) in sectors.iter_mut().zip(values.iter()) {
                *slot = as_timing("sector_times", value);
            }
        }
    }

    sectors
}

fn extract_session(raw: &Value) -> SessionPatch {
    SessionPatch {
        session_type: lookup(raw, aliases::SESSION_TYPE).and_then(as_string),
        is_running: lookup(raw, aliases::SESSION_RUNNING).and_then(as_bool),
        flag_status: lookup(raw, aliases::SESSION_FLAG).and_then(as_string),
        total_time: lookup(raw, aliases::SESSION_TIME).and_then(|v| as_timing("race_time", v)),
        total_laps: lookup(raw, aliases::SESSION_TOTAL_LAPS).and_then(as_u32),
        current_lap: lookup(raw, aliases::SESSION_CURRENT_LAP).and_then(as_u32),
        track_name: lookup(raw, aliases::SESSION_TRACK_NAME).and_then(as_string),
    }
}

fn extract_car(raw: &Value) -> CarPatch {
    CarPatch {
        name: lookup(raw, aliases::CAR_NAME).and_then(as_string),
        manufacturer: lookup(raw, aliases::CAR_MANUFACTURER).and_then(as_string),
        scale: lookup(raw, aliases::CAR_SCALE).and_then(as_string),
        color: lookup(raw, aliases::CAR_COLOR).and_then(as_string),
        digital_analog: lookup(raw, aliases::CAR_DIGITAL).and_then(as_string),
    }
}

fn extract_track(raw: &Value) -> TrackPatch {
    // `sectors` is a list in some producers and a count in others.
    let sector_count = match lookup(raw, aliases::TRACK_SECTORS) {
        Some(Value::Array(values)) => u32::try_from(values.len()).ok(),
        Some(other) => as_u32(other),
        None => None,
    };

    TrackPatch {
        name: lookup(raw, aliases::TRACK_NAME).and_then(as_string),
        length: lookup(raw, aliases::TRACK_LENGTH).and_then(as_f64),
        sector_count,
        layout: lookup(raw, aliases::TRACK_LAYOUT).and_then(as_string),
    }
}
