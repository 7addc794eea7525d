//! Webhook ingress
//!
//! The status contract: 200 `success` when the event merged, 200 `ignored`
//! when it was degraded or unrecognized (a partial payload is not an
//! error), 400 only for unparseable JSON, 500 only for internal failures.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::api::websocket::AppState;
use crate::ingest::IngestOutcome;

/// Webhook acknowledgement body.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WebhookResponse {
    fn success() -> Self {
        Self {
            status: "success",
            message: None,
        }
    }

    fn ignored(reason: String) -> Self {
        Self {
            status: "ignored",
            message: Some(reason),
        }
    }

    fn error(message: String) -> Self {
        Self {
            status: "error",
            message: Some(message),
        }
    }
}

/// POST /webhook - race, session, lap and car payloads.
pub async fn race_webhook(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let raw = match payload {
        Ok(Json(raw)) => raw,
        Err(rejection) => return bad_request(rejection),
    };

    respond(state.pipeline.ingest(raw))
}

/// POST /webhook/track - track layout metadata.
pub async fn track_webhook(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let raw = match payload {
        Ok(Json(raw)) => raw,
        Err(rejection) => return bad_request(rejection),
    };

    respond(state.pipeline.ingest_track(raw))
}

fn bad_request(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(WebhookResponse::error(rejection.body_text())),
    )
        .into_response()
}

fn respond(outcome: Result<IngestOutcome, crate::error::IngestError>) -> Response {
    match outcome {
        Ok(IngestOutcome::Applied { .. }) => Json(WebhookResponse::success()).into_response(),
        Ok(IngestOutcome::Ignored { reason }) => {
            Json(WebhookResponse::ignored(reason)).into_response()
        }
        Err(e) => {
            error!(error = %e, "webhook ingestion failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WebhookResponse::error(e.to_string())),
            )
                .into_response()
        }
    }
}
