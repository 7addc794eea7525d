//! Live push channel: broadcaster, message types and the socket handler

pub mod broadcaster;
pub mod events;
pub mod handler;
pub mod state;

pub use broadcaster::Broadcaster;
pub use events::{PushKind, WsMessage};
pub use state::AppState;
