//! Car registry
//!
//! First-seen-wins: the first registration of a `car_id` creates the
//! record, later registrations are no-ops regardless of payload. Colors
//! are normalized to `#rrggbb`; producers that send nothing usable get a
//! deterministic palette pick.

use serde_json::{Map, Value};

use crate::types::{CanonicalEvent, CarRecord, RaceState, StateDelta};

/// Fallback colors, picked by registry size modulo length.
const PALETTE: [&str; 8] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6", "#9a6324",
];

/// Car fields we map explicitly; everything else lands in `metadata`.
const KNOWN_CAR_KEYS: [&str; 6] = ["id", "name", "manufacturer", "scale", "color", "digital_analog"];

pub fn apply(state: &mut RaceState, event: &CanonicalEvent, delta: &mut StateDelta) {
    let Some(car_id) = event.car_id.as_deref() else { return };

    // First-seen-wins: re-registration never mutates the record.
    if state.cars.contains_key(car_id) {
        return;
    }

    let patch = event.car.clone().unwrap_or_default();
    let color = normalize_color(patch.color.as_deref(), state.cars.len());

    let record = CarRecord {
        id: car_id.to_string(),
        name: patch.name.unwrap_or_else(|| format!("Car {}", car_id)),
        manufacturer: patch.manufacturer,
        scale: patch.scale,
        color,
        digital_analog: patch.digital_analog,
        metadata: car_extras(&event.raw_payload),
    };

    state.cars.insert(car_id.to_string(), record);
    delta.car_registry_changed = true;
}

/// Normalize a producer color to `#rrggbb` lowercase.
///
/// Accepts `rgb(r,g,b)` / `rgba(r,g,b,a)` and 3- or 6-digit hex. Anything
/// else falls back to the palette entry for the current registry size.
pub fn normalize_color(input: Option<&str>, registry_len: usize) -> String {
    input
        .and_then(parse_color)
        .unwrap_or_else(|| PALETTE[registry_len % PALETTE.len()].to_string())
}

fn parse_color(input: &str) -> Option<String> {
    let input = input.trim();

    if let Some(body) = input
        .strip_prefix("rgba(")
        .or_else(|| input.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let mut channels = body.split(',').map(|part| part.trim().parse::<u8>());
        let r = channels.next()?.ok()?;
        let g = channels.next()?.ok()?;
        let b = channels.next()?.ok()?;
        return Some(format!("#{:02x}{:02x}{:02x}", r, g, b));
    }

    if let Some(hex) = input.strip_prefix('#') {
        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Some(format!("#{}", hex.to_ascii_lowercase()));
        }
        if hex.len() == 3 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            let expanded: String = hex
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_lowercase();
            return Some(format!("#{}", expanded));
        }
    }

    None
}

/// Collect free-form car fields the record has no column for.
fn car_extras(raw: &Value) -> Map<String, Value> {
    let car_object = raw
        .get("event_data")
        .and_then(|data| data.get("car_data"))
        .or_else(|| raw.get("car_data"));

    match car_object {
        Some(Value::Object(fields)) => fields
            .iter()
            .filter(|(key, _)| !KNOWN_CAR_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        _ => Map::new(),
    }
}
