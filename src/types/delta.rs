//! State deltas
//!
//! `apply` returns a description of exactly what changed. The broadcaster
//! uses it to decide which push kinds to emit; tests use it to assert
//! minimal-diff behavior. Fanout itself always carries full snapshots.

use serde::{Deserialize, Serialize};

/// What one `apply` call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDelta {
    /// Driver ids whose state was touched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drivers_touched: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub session_changed: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub track_changed: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub car_registry_changed: bool,
}

impl StateDelta {
    /// True when the apply was a no-op.
    pub fn is_empty(&self) -> bool {
        self.drivers_touched.is_empty()
            && !self.session_changed
            && !self.track_changed
            && !self.car_registry_changed
    }

    pub fn touch_driver(&mut self, driver_id: &str) {
        if !self.drivers_touched.iter().any(|id| id == driver_id) {
            self.drivers_touched.push(driver_id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delta_is_empty() {
        assert!(StateDelta::default().is_empty());
    }

    #[test]
    fn test_touch_driver_dedupes() {
        let mut delta = StateDelta::default();
        delta.touch_driver("d1");
        delta.touch_driver("d1");
        assert_eq!(delta.drivers_touched, vec!["d1".to_string()]);
        assert!(!delta.is_empty());
    }
}
