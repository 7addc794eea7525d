//! API module for HTTP and WebSocket endpoints
//!
//! Webhook ingress, snapshot and analytics REST endpoints, and the live
//! WebSocket push channel.

pub mod http;
pub mod rest;
pub mod websocket;
