//! In-process connections for registry tests.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{ChatMessage, ConnectionId, ConnectionInfo, ConnectionSink, TransportError};

const RECV_TIMEOUT: Duration = Duration::from_secs(1);

/// Sink that forwards frames to a [`TestPeer`], optionally failing after
/// a number of successful writes.
pub(crate) struct TestSink {
    frames: mpsc::UnboundedSender<String>,
    failure: Option<(usize, TransportError)>,
    attempts: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
}

/// Receiving side of a [`TestSink`]
pub(crate) struct TestPeer {
    frames: mpsc::UnboundedReceiver<String>,
    attempts: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
}

/// Sink whose writes never complete
pub(crate) struct StalledSink {
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl ConnectionSink for TestSink {
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some((after, error)) = &self.failure
            && attempt >= *after
        {
            return Err(error.clone());
        }
        self.frames
            .send(frame)
            .map_err(|_| TransportError::Fault("peer dropped".to_string()))
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectionSink for StalledSink {
    async fn send(&mut self, _frame: String) -> Result<(), TransportError> {
        std::future::pending().await
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl TestPeer {
    /// Next frame if one is already queued
    pub(crate) fn try_next_frame(&mut self) -> Option<String> {
        self.frames.try_recv().ok()
    }

    /// Next message if one is already queued
    pub(crate) fn try_next(&mut self) -> Option<ChatMessage> {
        self.try_next_frame()
            .map(|frame| ChatMessage::decode(&frame).unwrap())
    }

    /// Wait for the next message
    pub(crate) async fn next(&mut self) -> Option<ChatMessage> {
        let frame = tokio::time::timeout(RECV_TIMEOUT, self.frames.recv())
            .await
            .ok()??;
        Some(ChatMessage::decode(&frame).unwrap())
    }

    /// Every message queued so far
    pub(crate) fn drain(&mut self) -> Vec<ChatMessage> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub(crate) fn test_connection() -> (Box<dyn ConnectionSink>, TestPeer) {
    build(None)
}

/// The first `after` writes succeed, every later write fails with `error`
pub(crate) fn failing_connection(
    after: usize,
    error: TransportError,
) -> (Box<dyn ConnectionSink>, TestPeer) {
    build(Some((after, error)))
}

pub(crate) fn stalled_connection() -> (Box<dyn ConnectionSink>, Arc<AtomicBool>) {
    let closed = Arc::new(AtomicBool::new(false));
    let sink = StalledSink {
        closed: closed.clone(),
    };
    (Box::new(sink), closed)
}

pub(crate) fn info() -> ConnectionInfo {
    ConnectionInfo {
        id: ConnectionId::new(),
        connected_at: 1000,
    }
}

fn build(failure: Option<(usize, TransportError)>) -> (Box<dyn ConnectionSink>, TestPeer) {
    let (tx, rx) = mpsc::unbounded_channel();
    let attempts = Arc::new(AtomicUsize::new(0));
    let closed = Arc::new(AtomicBool::new(false));
    let sink = TestSink {
        frames: tx,
        failure,
        attempts: attempts.clone(),
        closed: closed.clone(),
    };
    let peer = TestPeer {
        frames: rx,
        attempts,
        closed,
    };
    (Box::new(sink), peer)
}
