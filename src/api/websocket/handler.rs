//! WebSocket connection handler
//!
//! Each viewer gets one socket. On connect it receives a welcome message
//! and the full current snapshot - a viewer joining late never sees an
//! empty state. After that, every state-changing ingest pushes a fresh
//! snapshot. Delivery is best-effort per viewer: a socket that cannot
//! accept a message within the send timeout is dropped without affecting
//! anyone else.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::SubscriberDeliveryError;
use crate::utils::now_millis;

use super::events::{ClientMessage, PongMessage, PushKind, WelcomeMessage, WsMessage};
use super::state::AppState;

/// How long one send to one viewer may take before that viewer is dropped.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual viewer connection.
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.broadcaster.subscribe();

    // Welcome with the current sequence ID, then the late-join snapshot.
    let welcome = WelcomeMessage::new(state.broadcaster.current_sequence_id());
    if let Ok(json) = serde_json::to_string(&welcome) {
        if send_bounded(&mut socket, json).await.is_err() {
            return; // Viewer disconnected immediately
        }
    }
    if send_snapshot(&mut socket, &state).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            // Broadcast events to the viewer
            result = rx.recv() => {
                match result {
                    Ok(msg) => {
                        if let Ok(json) = serde_json::to_string(&msg) {
                            if let Err(e) = send_bounded(&mut socket, json).await {
                                warn!(error = %e, "dropping viewer");
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // The viewer fell behind the channel; a fresh
                        // snapshot brings it back to consistency.
                        debug!(missed = n, "viewer lagged; resending snapshot");
                        if send_snapshot(&mut socket, &state).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }

            // Handle viewer messages
            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut socket).await {
                            break;
                        }
                    }
                    Some(Err(_)) => break, // WebSocket error
                    None => break, // Viewer disconnected
                }
            }
        }
    }
}

/// Send the full current snapshot as a race_update push.
async fn send_snapshot(
    socket: &mut WebSocket,
    state: &AppState,
) -> Result<(), SubscriberDeliveryError> {
    let msg = WsMessage {
        kind: PushKind::RaceUpdate,
        sequence_id: state.broadcaster.current_sequence_id(),
        timestamp: now_millis(),
        snapshot: state.store.snapshot(),
    };
    match serde_json::to_string(&msg) {
        Ok(json) => send_bounded(socket, json).await,
        Err(_) => Ok(()),
    }
}

/// One send, bounded by `SEND_TIMEOUT`. A slow viewer stalls only itself.
async fn send_bounded(socket: &mut WebSocket, json: String) -> Result<(), SubscriberDeliveryError> {
    match tokio::time::timeout(SEND_TIMEOUT, socket.send(Message::Text(json))).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(_)) => Err(SubscriberDeliveryError::Disconnected),
        Err(_) => Err(SubscriberDeliveryError::Timeout),
    }
}

/// Handle a message from the viewer.
/// Returns false if the connection should be closed.
async fn handle_client_message(msg: Message, socket: &mut WebSocket) -> bool {
    match msg {
        Message::Text(text) => {
            if let Ok(ClientMessage::Ping) = serde_json::from_str::<ClientMessage>(&text) {
                if let Ok(json) = serde_json::to_string(&PongMessage::default()) {
                    let _ = socket.send(Message::Text(json)).await;
                }
            }
            true
        }
        Message::Binary(_) => true, // Ignore binary messages
        Message::Ping(data) => {
            let _ = socket.send(Message::Pong(data)).await;
            true
        }
        Message::Pong(_) => true,
        Message::Close(_) => false,
    }
}
