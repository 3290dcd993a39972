//! WebSocket chat relay library.
//!
//! Clients connect over WebSocket, broadcast chat messages to every connected
//! client and receive the full history on join. Messages are persisted to an
//! append-only log (Redis) before they are delivered.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
