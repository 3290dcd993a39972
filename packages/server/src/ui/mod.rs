//! WebSocket chat relay server.

mod handler;
pub mod origin;
mod server;
mod signal;
pub mod state;

pub use origin::OriginPolicy;
pub use server::{Server, ServerConfig, ServerError, router};
