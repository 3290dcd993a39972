//! ConnectionSink の実装
//!
//! WebSocket の生成（upgrade）は UI 層で行われます。この実装は分割された
//! 書き込み側を受け取り、レジストリからの送信に使用します。

pub mod websocket;

pub use websocket::{PeerClose, WebSocketSink};
