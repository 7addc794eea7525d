//! Analytics endpoints
//!
//! Each handler answers one read-only query over the persisted log,
//! parameterized by driver id or none.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::error;

use crate::api::websocket::AppState;
use crate::error::PersistError;

use super::{ApiError, ApiResponse};

/// Optional driver filter.
#[derive(Debug, Deserialize)]
pub struct DriverParams {
    pub driver: Option<String>,
}

/// GET /api/analysis/stats - ranked driver statistics.
pub async fn get_driver_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DriverParams>,
) -> Response {
    to_response(
        &state,
        state.analytics.driver_stats(params.driver.as_deref()),
    )
}

/// GET /api/analysis/consistency - consistency scores (≥3 laps only).
pub async fn get_consistency(State(state): State<Arc<AppState>>) -> Response {
    to_response(&state, state.analytics.consistency())
}

/// GET /api/analysis/trend - lap-time progression per driver.
pub async fn get_trend(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DriverParams>,
) -> Response {
    to_response(&state, state.analytics.lap_trend(params.driver.as_deref()))
}

/// GET /api/analysis/sectors - sector averages and bests.
pub async fn get_sectors(State(state): State<Arc<AppState>>) -> Response {
    to_response(&state, state.analytics.sector_performance())
}

fn to_response<T: serde::Serialize>(
    state: &AppState,
    result: Result<Vec<T>, PersistError>,
) -> Response {
    match result {
        Ok(rows) => {
            let sequence_id = state.broadcaster.current_sequence_id();
            let total = rows.len();
            Json(ApiResponse::with_total(rows, sequence_id, total)).into_response()
        }
        Err(e) => {
            error!(error = %e, "analytics query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::internal(e.to_string())),
            )
                .into_response()
        }
    }
}
