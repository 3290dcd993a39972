//! InMemory MessageLog 実装
//!
//! プロセスの再起動で履歴は失われます。`--redis-url` を指定しない開発用途と
//! テストで使用します。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{LogError, MessageLog};

/// インメモリの追記専用ログ
#[derive(Debug, Default)]
pub struct InMemoryMessageLog {
    entries: Mutex<Vec<String>>,
}

impl InMemoryMessageLog {
    /// 空のログを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存のエントリを持つログを作成
    pub fn with_entries(entries: Vec<String>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// 保存されているエントリ数
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl MessageLog for InMemoryMessageLog {
    async fn exists(&self) -> Result<bool, LogError> {
        Ok(!self.entries.lock().await.is_empty())
    }

    async fn append(&self, entry: &str) -> Result<(), LogError> {
        self.entries.lock().await.push(entry.to_string());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<String>, LogError> {
        Ok(self.entries.lock().await.clone())
    }
}
