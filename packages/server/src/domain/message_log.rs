//! MessageLog trait 定義
//!
//! 追記専用の永続ログ（Durable Log）へのインターフェース。
//! エントリはエンコード済みの文字列として保存され、挿入順 = 到着順 = 再生順です。
//!
//! ## 並行アクセス
//!
//! 書き込みは末尾への追記のみ、読み込みは常に全件スナップショットなので、
//! 実装は複数タスクからの同時アクセスに対して安全であることが求められます。

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::error::LogError;

/// Append-only durable store of encoded chat messages
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// ログにエントリが 1 件以上存在するか
    async fn exists(&self) -> Result<bool, LogError>;

    /// エントリを末尾に追記
    async fn append(&self, entry: &str) -> Result<(), LogError>;

    /// 全エントリを挿入順に取得
    async fn read_all(&self) -> Result<Vec<String>, LogError>;
}
