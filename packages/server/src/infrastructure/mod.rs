//! Infrastructure layer
//!
//! - `message_log`: Durable Log の実装（Redis, インメモリ）
//! - `connection`: WebSocket を使った ConnectionSink の実装
//! - `dto`: HTTP API のレスポンス DTO

pub mod connection;
pub mod dto;
pub mod message_log;
