//! Session state

use serde::{Deserialize, Serialize};

use super::timing::TimingValue;

/// Session lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Waiting,
    Running,
    Finished,
}

/// The one session per running process.
///
/// Mutated only by SessionUpdate events, merge-by-presence. `session_start`
/// is stamped on the first transition to Running and never overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_type: String,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<TimingValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_laps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_lap: Option<u32>,
    /// Epoch milliseconds of the first transition to Running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_start: Option<i64>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            session_type: "Practice".to_string(),
            status: SessionStatus::Waiting,
            flag_status: None,
            total_time: None,
            total_laps: None,
            current_lap: None,
            session_start: None,
        }
    }
}
