//! Per-connection read loop.
//!
//! Decodes one inbound frame at a time and submits it to the registry as a
//! broadcast. Any read or decode failure ends the loop; the session then
//! deregisters the connection. Nothing is retried.

use axum::extract::ws::Message;
use futures_util::stream::{Stream, StreamExt};

use crate::{
    domain::{ChatMessage, ConnectionId},
    infrastructure::connection::PeerClose,
    usecase::RegistryHandle,
};

/// Why a read loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLoopEnd {
    /// The peer sent a Close frame
    PeerClosed(Option<u16>),
    /// The stream ended without a Close frame
    StreamEnded,
    /// Reading from the socket failed
    Transport(String),
    /// The payload was not a well-formed chat message
    Malformed(String),
    /// The registry stopped accepting broadcasts
    RegistryClosed,
}

pub async fn read_loop<S>(
    id: ConnectionId,
    mut receiver: S,
    registry: &RegistryHandle,
    peer_close: &PeerClose,
) -> ReadLoopEnd
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    while let Some(frame) = receiver.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => return ReadLoopEnd::Transport(e.to_string()),
        };

        let decoded = match frame {
            Message::Text(text) => ChatMessage::decode(text.as_str()),
            Message::Binary(bytes) => ChatMessage::decode_slice(&bytes),
            Message::Ping(_) | Message::Pong(_) => continue,
            Message::Close(close_frame) => {
                let code = close_frame.map(|close_frame| close_frame.code);
                if let Some(code) = code {
                    peer_close.record(code);
                }
                return ReadLoopEnd::PeerClosed(code);
            }
        };

        let message = match decoded {
            Ok(message) => message,
            Err(e) => return ReadLoopEnd::Malformed(e.to_string()),
        };

        tracing::debug!(
            "Received message from '{}' on connection '{}'",
            message.username,
            id
        );
        if registry.broadcast(message).await.is_err() {
            return ReadLoopEnd::RegistryClosed;
        }
    }

    ReadLoopEnd::StreamEnded
}

#[cfg(test)]
mod tests {
    use std::{io, sync::Arc};

    use axum::{
        body::Bytes,
        extract::ws::{CloseFrame, Utf8Bytes, close_code},
    };
    use futures_util::stream;

    use super::*;
    use crate::{
        infrastructure::message_log::InMemoryMessageLog,
        usecase::registry::{RegistryConfig, spawn_registry, testing::{info, test_connection}},
    };

    fn text(payload: &str) -> Result<Message, axum::Error> {
        Ok(Message::Text(payload.to_string().into()))
    }

    #[tokio::test]
    async fn test_messages_are_broadcast_until_stream_ends() {
        // テスト項目: 受信したメッセージが順にブロードキャストされ、ストリーム終了でループが終わる
        // given (前提条件):
        let log = Arc::new(InMemoryMessageLog::new());
        let (registry, _worker) = spawn_registry(log.clone(), RegistryConfig::default());
        let (sink, mut peer) = test_connection();
        registry.register(info(), sink).await.unwrap();
        let frames = stream::iter(vec![
            text(r#"{"username":"alice","text":"hi"}"#),
            Ok(Message::Ping(Bytes::from_static(b"ping"))),
            Ok(Message::Binary(Bytes::from_static(
                br#"{"username":"alice","text":"binary"}"#,
            ))),
        ]);

        // when (操作):
        let end = read_loop(ConnectionId::new(), frames, &registry, &PeerClose::default()).await;
        registry.connections().await.unwrap();

        // then (期待する結果):
        assert_eq!(end, ReadLoopEnd::StreamEnded);
        assert_eq!(
            peer.drain(),
            vec![
                ChatMessage::new("alice", "hi"),
                ChatMessage::new("alice", "binary"),
            ]
        );
        assert_eq!(log.len().await, 2);
    }

    #[tokio::test]
    async fn test_malformed_payload_ends_loop() {
        // テスト項目: 不正なペイロードを受信するとループが終了し、以降のメッセージは処理されない
        // given (前提条件):
        let log = Arc::new(InMemoryMessageLog::new());
        let (registry, _worker) = spawn_registry(log.clone(), RegistryConfig::default());
        let frames = stream::iter(vec![
            text("definitely not json"),
            text(r#"{"username":"alice","text":"never sent"}"#),
        ]);

        // when (操作):
        let end = read_loop(ConnectionId::new(), frames, &registry, &PeerClose::default()).await;
        registry.connections().await.unwrap();

        // then (期待する結果):
        assert!(matches!(end, ReadLoopEnd::Malformed(_)));
        assert!(log.is_empty().await);
    }

    #[tokio::test]
    async fn test_close_frame_records_code() {
        // テスト項目: Close フレームを受信するとコードが記録されループが終了する
        // given (前提条件):
        let (registry, _worker) =
            spawn_registry(Arc::new(InMemoryMessageLog::new()), RegistryConfig::default());
        let peer_close = PeerClose::default();
        let frames = stream::iter(vec![Ok(Message::Close(Some(CloseFrame {
            code: close_code::AWAY,
            reason: Utf8Bytes::from_static("tab closed"),
        })))]);

        // when (操作):
        let end = read_loop(ConnectionId::new(), frames, &registry, &peer_close).await;

        // then (期待する結果):
        assert_eq!(end, ReadLoopEnd::PeerClosed(Some(close_code::AWAY)));
        assert!(peer_close.is_going_away());
    }

    #[tokio::test]
    async fn test_transport_error_ends_loop() {
        // テスト項目: 読み込みエラーでループが終了する
        // given (前提条件):
        let (registry, _worker) =
            spawn_registry(Arc::new(InMemoryMessageLog::new()), RegistryConfig::default());
        let frames = stream::iter(vec![Err(axum::Error::new(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "reset",
        )))]);

        // when (操作):
        let end = read_loop(ConnectionId::new(), frames, &registry, &PeerClose::default()).await;

        // then (期待する結果):
        assert!(matches!(end, ReadLoopEnd::Transport(_)));
    }

    #[tokio::test]
    async fn test_registry_closed_ends_loop() {
        // テスト項目: レジストリが停止している場合はループが終了する
        // given (前提条件):
        let (registry, worker) =
            spawn_registry(Arc::new(InMemoryMessageLog::new()), RegistryConfig::default());
        registry.shutdown().await.unwrap();
        worker.await.unwrap().unwrap();
        let frames = stream::iter(vec![text(r#"{"username":"alice","text":"hi"}"#)]);

        // when (操作):
        let end = read_loop(ConnectionId::new(), frames, &registry, &PeerClose::default()).await;

        // then (期待する結果):
        assert_eq!(end, ReadLoopEnd::RegistryClosed);
    }
}
