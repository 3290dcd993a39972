//! Chat message value object.
//!
//! The same JSON encoding is used on the wire and in the durable log, so a
//! stored entry can be sent to a client without any translation.

use serde::{Deserialize, Serialize};

use super::error::CodecError;

/// A chat message as sent by a client.
///
/// Unknown fields are ignored and missing fields default to the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessage {
    pub username: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            text: text.into(),
        }
    }

    /// Encode into the canonical JSON representation.
    pub fn encode(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON. Anything that is not a JSON object with string
    /// (or absent) `username` and `text` fields is rejected.
    pub fn decode(payload: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Same as [`ChatMessage::decode`] for binary frames.
    pub fn decode_slice(payload: &[u8]) -> Result<Self, CodecError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uses_both_fields() {
        // テスト項目: エンコード結果に username と text のみが含まれる
        // given (前提条件):
        let message = ChatMessage::new("alice", "hi");

        // when (操作):
        let encoded = message.encode().unwrap();

        // then (期待する結果):
        assert_eq!(encoded, r#"{"username":"alice","text":"hi"}"#);
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        // テスト項目: 未知のフィールドは無視される
        // given (前提条件):
        let payload = r#"{"username":"bob","text":"yo","color":"red"}"#;

        // when (操作):
        let message = ChatMessage::decode(payload).unwrap();

        // then (期待する結果):
        assert_eq!(message, ChatMessage::new("bob", "yo"));
    }

    #[test]
    fn test_decode_missing_fields_default_to_empty() {
        // テスト項目: 欠けているフィールドは空文字列になる
        // given (前提条件):
        let payload = r#"{"text":"anonymous"}"#;

        // when (操作):
        let message = ChatMessage::decode(payload).unwrap();

        // then (期待する結果):
        assert_eq!(message.username, "");
        assert_eq!(message.text, "anonymous");

        let empty = ChatMessage::decode("{}").unwrap();
        assert_eq!(empty, ChatMessage::default());
    }

    #[test]
    fn test_decode_rejects_malformed_payloads() {
        // テスト項目: 構造的に不正なペイロードはエラーになる
        // given (前提条件):
        let payloads = [
            "not json",
            r#""just a string""#,
            "null",
            r#"{"username":5,"text":"x"}"#,
            r#"{"username":"a","text":"#,
        ];

        // when (操作) / then (期待する結果):
        for payload in payloads {
            assert!(
                ChatMessage::decode(payload).is_err(),
                "payload should be rejected: {payload}"
            );
        }
    }

    #[test]
    fn test_decode_slice_accepts_binary_json() {
        // テスト項目: バイナリフレームの JSON もデコードできる
        // given (前提条件):
        let payload = br#"{"username":"carol","text":"bin"}"#;

        // when (操作):
        let message = ChatMessage::decode_slice(payload).unwrap();

        // then (期待する結果):
        assert_eq!(message, ChatMessage::new("carol", "bin"));
    }
}
