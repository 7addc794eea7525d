//! Timing values
//!
//! Every duration in the system carries both a display string and a raw
//! millisecond count. Ordering and aggregation always use `raw_ms`; the
//! display form is what timing controllers send and what viewers render.

use serde::{Deserialize, Serialize};

/// A lap or sector duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingValue {
    /// Human-readable form, `M:SS.mmm` or `SS.mmm`
    pub display: String,
    /// Raw duration in milliseconds
    pub raw_ms: u64,
}

impl TimingValue {
    /// Build from a raw millisecond count.
    pub fn from_millis(raw_ms: u64) -> Self {
        Self {
            display: format_millis(raw_ms),
            raw_ms,
        }
    }

    /// Build from a seconds value (the unit bare JSON numbers use).
    ///
    /// Returns `None` for negative or non-finite input.
    pub fn from_seconds(seconds: f64) -> Option<Self> {
        if !seconds.is_finite() || seconds < 0.0 {
            return None;
        }
        Some(Self::from_millis((seconds * 1000.0).round() as u64))
    }

    /// Parse a display string (`"1:02.345"` or `"62.345"`).
    pub fn parse_display(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let mut minutes = 0u64;
        let seconds_part = match text.rsplit_once(':') {
            Some((min_part, sec_part)) => {
                minutes = min_part.trim().parse::<u64>().ok()?;
                sec_part
            }
            None => text,
        };

        let seconds = seconds_part.trim().parse::<f64>().ok()?;
        if !seconds.is_finite() || seconds < 0.0 {
            return None;
        }

        let raw_ms = minutes * 60_000 + (seconds * 1000.0).round() as u64;
        Some(Self::from_millis(raw_ms))
    }
}

/// Format a millisecond count as `M:SS.mmm` (or `SS.mmm` under a minute).
pub fn format_millis(raw_ms: u64) -> String {
    let minutes = raw_ms / 60_000;
    let seconds = (raw_ms % 60_000) / 1000;
    let millis = raw_ms % 1000;

    if minutes > 0 {
        format!("{}:{:02}.{:03}", minutes, seconds, millis)
    } else {
        format!("{}.{:03}", seconds, millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis_formats_display() {
        assert_eq!(TimingValue::from_millis(62_345).display, "1:02.345");
        assert_eq!(TimingValue::from_millis(9_021).display, "9.021");
        assert_eq!(TimingValue::from_millis(0).display, "0.000");
    }

    #[test]
    fn test_parse_display_minute_form() {
        let t = TimingValue::parse_display("1:02.345").unwrap();
        assert_eq!(t.raw_ms, 62_345);
    }

    #[test]
    fn test_parse_display_seconds_form() {
        let t = TimingValue::parse_display("62.4").unwrap();
        assert_eq!(t.raw_ms, 62_400);
    }

    #[test]
    fn test_from_seconds_rejects_negative() {
        assert!(TimingValue::from_seconds(-1.0).is_none());
        assert!(TimingValue::from_seconds(f64::NAN).is_none());
    }

    #[test]
    fn test_parse_display_rejects_garbage() {
        assert!(TimingValue::parse_display("").is_none());
        assert!(TimingValue::parse_display("fast").is_none());
        assert!(TimingValue::parse_display("-3.2").is_none());
    }
}
