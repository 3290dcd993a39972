//! Writes to a single connection, optionally bounded by a timeout.

use std::time::Duration;

use crate::domain::{ConnectionSink, TransportError};

pub(super) async fn write_frame(
    sink: &mut dyn ConnectionSink,
    frame: String,
    write_timeout: Option<Duration>,
) -> Result<(), TransportError> {
    match write_timeout {
        Some(limit) => tokio::time::timeout(limit, sink.send(frame))
            .await
            .unwrap_or(Err(TransportError::TimedOut(limit))),
        None => sink.send(frame).await,
    }
}

pub(super) async fn close_sink(sink: &mut dyn ConnectionSink, write_timeout: Option<Duration>) {
    match write_timeout {
        Some(limit) => {
            let _ = tokio::time::timeout(limit, sink.close()).await;
        }
        None => sink.close().await,
    }
}
