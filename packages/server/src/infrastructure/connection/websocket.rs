//! WebSocket を使った ConnectionSink 実装
//!
//! ## 責務
//!
//! - 分割された WebSocket の書き込み側（`SplitSink`）を保持
//! - 書き込みエラーを想定内（GoingAway / EndOfStream）と想定外に分類
//!
//! ## 設計ノート
//!
//! 読み込みループが受け取った Close フレームのコードを [`PeerClose`] で共有します。
//! 相手が "going away" (1001) を通知した後の書き込み失敗は想定内として扱います。
//! 相手が既に接続を閉じている場合（`ConnectionClosed` / `AlreadyClosed`）や
//! EOF も、ストリーム終端として想定内に分類します。

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicU16, Ordering},
    },
};

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket, close_code};
use futures_util::{sink::SinkExt, stream::SplitSink};

use crate::domain::{ConnectionSink, TransportError};

/// Close code announced by the peer, shared between the read loop and the sink
#[derive(Debug, Clone, Default)]
pub struct PeerClose(Arc<AtomicU16>);

impl PeerClose {
    /// Remember the close code received from the peer
    pub fn record(&self, code: u16) {
        self.0.store(code, Ordering::Release);
    }

    /// The recorded close code, if the peer sent one
    pub fn code(&self) -> Option<u16> {
        match self.0.load(Ordering::Acquire) {
            0 => None,
            code => Some(code),
        }
    }

    pub fn is_going_away(&self) -> bool {
        self.code() == Some(close_code::AWAY)
    }
}

/// Write half of an upgraded WebSocket
pub struct WebSocketSink {
    sender: SplitSink<WebSocket, Message>,
    peer_close: PeerClose,
}

impl WebSocketSink {
    pub fn new(sender: SplitSink<WebSocket, Message>, peer_close: PeerClose) -> Self {
        Self { sender, peer_close }
    }
}

#[async_trait]
impl ConnectionSink for WebSocketSink {
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        self.sender
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| classify(&e, &self.peer_close))
    }

    async fn close(&mut self) {
        if let Err(e) = self.sender.close().await {
            tracing::debug!("WebSocket close failed: {}", e);
        }
    }
}

/// Map a WebSocket write error onto the transport error taxonomy
pub fn classify(error: &axum::Error, peer_close: &PeerClose) -> TransportError {
    if peer_close.is_going_away() {
        TransportError::GoingAway
    } else if reached_end_of_stream(error) {
        TransportError::EndOfStream
    } else {
        TransportError::Fault(error.to_string())
    }
}

fn reached_end_of_stream(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(io_error) = err.downcast_ref::<io::Error>()
            && io_error.kind() == io::ErrorKind::UnexpectedEof
        {
            return true;
        }
        if matches!(
            err.downcast_ref::<tungstenite::Error>(),
            Some(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed)
        ) {
            return true;
        }
        current = err.source();
    }
    false
}
