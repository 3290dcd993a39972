//! Redis MessageLog 実装
//!
//! 1 つのリストキーに JSON エンコード済みのメッセージを `RPUSH` で追記し、
//! `LRANGE key 0 -1` で全件を取得します。接続は `ConnectionManager` が
//! 自動的に再接続します。

use async_trait::async_trait;
use redis::{RedisError, aio::ConnectionManager};

use crate::domain::{LogError, MessageLog};

/// Default list key holding the chat history
pub const DEFAULT_LOG_KEY: &str = "chat_messages";

/// Redis list backed durable log
#[derive(Clone)]
pub struct RedisMessageLog {
    connection: ConnectionManager,
    key: String,
}

impl RedisMessageLog {
    /// Connect to the Redis server at `url` (e.g. `redis://127.0.0.1:6379/0`)
    pub async fn connect(url: &str, key: impl Into<String>) -> Result<Self, LogError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let connection = ConnectionManager::new(client).await.map_err(unavailable)?;

        Ok(Self {
            connection,
            key: key.into(),
        })
    }

    /// List key holding the chat history
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl MessageLog for RedisMessageLog {
    async fn exists(&self) -> Result<bool, LogError> {
        let mut connection = self.connection.clone();
        let exists: bool = redis::cmd("EXISTS")
            .arg(&self.key)
            .query_async(&mut connection)
            .await
            .map_err(backend)?;
        Ok(exists)
    }

    async fn append(&self, entry: &str) -> Result<(), LogError> {
        let mut connection = self.connection.clone();
        let _length: i64 = redis::cmd("RPUSH")
            .arg(&self.key)
            .arg(entry)
            .query_async(&mut connection)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<String>, LogError> {
        let mut connection = self.connection.clone();
        let entries: Vec<String> = redis::cmd("LRANGE")
            .arg(&self.key)
            .arg(0)
            .arg(-1)
            .query_async(&mut connection)
            .await
            .map_err(backend)?;
        Ok(entries)
    }
}

fn unavailable(error: RedisError) -> LogError {
    LogError::Unavailable(error.to_string())
}

fn backend(error: RedisError) -> LogError {
    if error.is_io_error() || error.is_connection_dropped() || error.is_timeout() {
        LogError::Unavailable(error.to_string())
    } else {
        LogError::Backend(error.to_string())
    }
}
