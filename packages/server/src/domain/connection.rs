//! Connection handle abstractions.
//!
//! A connection is identified by a [`ConnectionId`]; its write half is a
//! [`ConnectionSink`] owned by the registry for the duration of its
//! membership. Whether a connection is open is only ever observed through a
//! failed write or read.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Unique identity of one live client session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh identity (UUID v4)
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Metadata kept by the registry for each member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    pub id: ConnectionId,
    /// Unix timestamp when the connection registered (milliseconds)
    pub connected_at: i64,
}

/// Failure writing to a connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The peer announced a normal "going away" close
    #[error("Peer is going away")]
    GoingAway,

    /// The underlying stream reached end-of-file
    #[error("Connection reached end of stream")]
    EndOfStream,

    /// The write did not complete within the configured bound
    #[error("Write timed out after {0:?}")]
    TimedOut(Duration),

    /// Any other transport failure
    #[error("Transport fault: {0}")]
    Fault(String),
}

impl TransportError {
    /// Expected errors race naturally against a normal disconnect. They are
    /// not logged and do not by themselves remove the connection; the read
    /// loop failing takes care of that.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::GoingAway | Self::EndOfStream)
    }
}

/// Write half of one client connection
#[async_trait]
pub trait ConnectionSink: Send {
    /// Write one already-encoded text frame
    async fn send(&mut self, frame: String) -> Result<(), TransportError>;

    /// Close the connection. Best effort, errors are ignored.
    async fn close(&mut self);
}
