//! Lenient value coercion
//!
//! Optional fields never fail normalization: a value of the wrong JSON type
//! is coerced where the intent is clear (numeric ids, stringly-typed
//! numbers, 0/1 booleans) and otherwise dropped with a warning.

use serde_json::Value;
use tracing::warn;

use crate::types::TimingValue;

/// External identity: accepts strings and numbers.
pub fn as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.round() as u32)
            }
        }
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// A duration in display form: strings parse as `M:SS.mmm`/`SS.mmm`, bare
/// numbers are seconds. Negative or unparseable values drop with a warning.
pub fn as_timing(field: &'static str, value: &Value) -> Option<TimingValue> {
    let timing = match value {
        Value::String(s) => TimingValue::parse_display(s),
        Value::Number(n) => n.as_f64().and_then(TimingValue::from_seconds),
        _ => None,
    };
    if timing.is_none() {
        warn!(field, value = %value, "dropping unusable timing value");
    }
    timing
}

/// A duration already in raw milliseconds (`laptime_raw` style fields).
pub fn as_timing_raw(field: &'static str, value: &Value) -> Option<TimingValue> {
    let raw_ms = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    if raw_ms.is_none() {
        warn!(field, value = %value, "dropping unusable raw timing value");
    }
    raw_ms.map(TimingValue::from_millis)
}
