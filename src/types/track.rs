//! Track layout metadata

use serde::{Deserialize, Serialize};

/// Track layout, merged by presence from TrackUpdate events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackLayout {
    pub name: String,
    /// Track length in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self {
            name: "Unknown Track".to_string(),
            length: None,
            sector_count: None,
            layout: None,
        }
    }
}
