//! Snapshot broadcaster
//!
//! A `tokio::sync::broadcast` channel fans every state-changing event out
//! to all connected viewers. Publishing never blocks and never waits for
//! receivers: a viewer that cannot keep up lags its own receiver and gets
//! a refresh, everyone else is unaffected. The broadcaster is injected
//! wherever it is needed rather than living in a process-wide global.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use crate::types::RaceState;
use crate::utils::now_millis;

use super::events::{PushKind, WsMessage};

/// Event broadcaster for the live push channel.
pub struct Broadcaster {
    tx: broadcast::Sender<WsMessage>,
    sequence_counter: AtomicU64,
}

impl Broadcaster {
    /// Create a broadcaster with the given channel capacity. Viewers that
    /// fall more than `capacity` messages behind miss events and are told
    /// to refresh.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            sequence_counter: AtomicU64::new(0),
        }
    }

    /// Push one full snapshot to every connected viewer.
    pub fn publish(&self, kind: PushKind, snapshot: RaceState) {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let msg = WsMessage {
            kind,
            sequence_id: seq,
            timestamp: now_millis(),
            snapshot,
        };
        // Ignore errors - just means no receivers are connected
        let _ = self.tx.send(msg);
    }

    /// Get the current sequence ID.
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    /// Subscribe to receive broadcast events.
    pub fn subscribe(&self) -> broadcast::Receiver<WsMessage> {
        self.tx.subscribe()
    }
}
