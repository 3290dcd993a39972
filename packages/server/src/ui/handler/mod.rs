//! Request handlers.

pub mod http;
pub mod message_router;
pub mod websocket;

pub use http::{debug_connections, health_check};
pub use websocket::websocket_handler;
