//! Persistence adapter: append-only event log with a background writer

mod store;
mod writer;

pub use store::{EventLog, EventLogConfig, EventLogInfo};
pub use writer::{spawn_writer, LogWriterHandle, WRITER_QUEUE_CAPACITY};
