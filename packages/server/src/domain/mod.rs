//! Domain layer
//!
//! チャットリレーの中核となる型と、外部との境界を表す trait を定義します。
//! 具体的な実装（Redis, WebSocket）は Infrastructure 層が提供します（依存性の逆転）。

pub mod connection;
pub mod error;
pub mod message;
pub mod message_log;

pub use connection::{ConnectionId, ConnectionInfo, ConnectionSink, TransportError};
pub use error::{CodecError, LogError, PersistError, RegistryError};
pub use message::ChatMessage;
pub use message_log::MessageLog;

#[cfg(test)]
pub use message_log::MockMessageLog;
