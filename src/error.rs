//! Error taxonomy
//!
//! Nothing in the ingestion path is fatal to the process. Every variant
//! here is a recovered condition: normalization failures degrade or ignore
//! the event, persistence failures are logged without rolling back the
//! state merge, and delivery failures drop one subscriber. The HTTP layer
//! maps them to the webhook status contract.

use thiserror::Error;

/// A payload could not be normalized into a canonical event.
#[derive(Debug, Error)]
pub enum NormalizationError {
    /// A required field had no present alias
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A required field was present but unusable
    #[error("malformed value for {field}: {detail}")]
    MalformedValue {
        field: &'static str,
        detail: String,
    },
}

/// The event log could not append or read.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("event log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("event log serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A delivery attempt to one subscriber failed.
///
/// Only that subscriber is affected; the connection handler drops it and
/// broadcast to everyone else continues.
#[derive(Debug, Error)]
pub enum SubscriberDeliveryError {
    #[error("subscriber send timed out")]
    Timeout,

    #[error("subscriber disconnected")]
    Disconnected,
}

/// Ingestion pipeline failure surfaced to the HTTP layer.
///
/// Normalization problems never reach here (they become an `Ignored`
/// outcome); this covers the genuinely unexpected.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("internal ingestion failure: {0}")]
    Internal(String),
}
