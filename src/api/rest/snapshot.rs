//! Snapshot and ops endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{error, info};

use crate::api::websocket::{AppState, PushKind};

use super::{ApiError, ApiResponse, LimitParams};

/// GET /api/data - the full current snapshot in one document.
pub async fn get_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.store.snapshot();
    let sequence_id = state.broadcaster.current_sequence_id();
    Json(ApiResponse::new(snapshot, sequence_id))
}

/// GET /api/car-database - the car registry alone.
pub async fn get_car_database(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cars = state.store.snapshot().cars;
    let sequence_id = state.broadcaster.current_sequence_id();
    let total = cars.len();
    Json(ApiResponse::with_total(cars, sequence_id, total))
}

/// GET /api/laps - most recent persisted laps, newest first.
pub async fn get_recent_laps(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    match state.analytics.recent_laps(params.normalized_limit()) {
        Ok(laps) => {
            let sequence_id = state.broadcaster.current_sequence_id();
            let total = laps.len();
            Json(ApiResponse::with_total(laps, sequence_id, total)).into_response()
        }
        Err(e) => {
            error!(error = %e, "recent laps query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::internal(e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /api/events - most recent persisted events of any kind, newest
/// first. The audit view: rows carry the raw payload as received.
pub async fn get_recent_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    match state.analytics.recent_events(params.normalized_limit()) {
        Ok(events) => {
            let sequence_id = state.broadcaster.current_sequence_id();
            let total = events.len();
            Json(ApiResponse::with_total(events, sequence_id, total)).into_response()
        }
        Err(e) => {
            error!(error = %e, "recent events query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::internal(e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /api/database/info - event log statistics.
pub async fn get_database_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.analytics.database_info() {
        Ok(info) => {
            let sequence_id = state.broadcaster.current_sequence_id();
            Json(ApiResponse::new(info, sequence_id)).into_response()
        }
        Err(e) => {
            error!(error = %e, "database info query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::internal(e.to_string())),
            )
                .into_response()
        }
    }
}

/// POST /api/session/reset - explicit reset back to an empty session.
///
/// The persisted event log is untouched; only live state resets. Viewers
/// get the cleared snapshot pushed immediately.
pub async fn reset_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.store.reset();
    info!("session reset");

    let snapshot = state.store.snapshot();
    state
        .broadcaster
        .publish(PushKind::RaceUpdate, snapshot.clone());

    let sequence_id = state.broadcaster.current_sequence_id();
    Json(ApiResponse::new(snapshot, sequence_id))
}
