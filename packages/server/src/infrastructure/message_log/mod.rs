//! Durable Log の実装
//!
//! - `redis`: Redis のリストを使った本番用の実装
//! - `inmemory`: プロセス内の `Vec` を使った開発・テスト用の実装

pub mod inmemory;
pub mod redis;

pub use self::inmemory::InMemoryMessageLog;
pub use self::redis::RedisMessageLog;
