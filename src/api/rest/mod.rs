//! REST API module for HTTP endpoints
//!
//! Webhook ingress plus read-only snapshot and analytics endpoints:
//! - `POST /webhook` - race/session/lap/car payloads
//! - `POST /webhook/track` - track layout metadata
//! - `GET /api/data` - full snapshot
//! - `GET /api/car-database` - car registry
//! - `GET /api/laps` - recent persisted laps
//! - `GET /api/events` - recent persisted events (audit view)
//! - `GET /api/analysis/*` - analytics documents
//! - `GET /api/database/info` - event log stats

pub mod analysis;
pub mod snapshot;
pub mod webhook;

use serde::{Deserialize, Serialize};

/// Standard API response wrapper for GET endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Current push sequence ID for cache invalidation
    pub sequence_id: u64,
    /// Total count (for list responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, sequence_id: u64) -> Self {
        Self {
            data,
            sequence_id,
            total: None,
        }
    }

    pub fn with_total(data: T, sequence_id: u64, total: usize) -> Self {
        Self {
            data,
            sequence_id,
            total: Some(total),
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}

/// Common limit parameter for list endpoints.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    /// Maximum number of items to return (default: 50, max: 500)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

impl LimitParams {
    pub fn normalized_limit(&self) -> usize {
        self.limit.min(500)
    }
}
