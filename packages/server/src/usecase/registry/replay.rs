//! History replay for a newly joined connection.

use std::time::Duration;

use crate::domain::{ChatMessage, ConnectionId, ConnectionSink, MessageLog};

use super::delivery::write_frame;

/// Result of replaying the durable log to one connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Entries written to the connection
    pub delivered: usize,
    /// Stored entries that could not be decoded
    pub skipped: usize,
    /// Replay stopped early on an unexpected write error
    pub aborted: bool,
}

/// Send the full ordered history to one connection.
///
/// Undecodable entries are skipped. Expected write errors are ignored; an
/// unexpected one stops the replay, the connection's own read loop will
/// fail and deregister it. Failing to read the log skips replay entirely.
pub async fn replay_history(
    log: &dyn MessageLog,
    id: ConnectionId,
    sink: &mut dyn ConnectionSink,
    write_timeout: Option<Duration>,
) -> ReplayOutcome {
    let mut outcome = ReplayOutcome::default();

    match log.exists().await {
        Ok(true) => {}
        Ok(false) => return outcome,
        Err(e) => {
            tracing::warn!("Skipping history replay for '{}': {}", id, e);
            return outcome;
        }
    }

    let entries = match log.read_all().await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to read history for '{}': {}", id, e);
            return outcome;
        }
    };

    for entry in entries {
        let frame = match ChatMessage::decode(&entry).and_then(|message| message.encode()) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Skipping corrupt history entry {:?}: {}", entry, e);
                outcome.skipped += 1;
                continue;
            }
        };

        match write_frame(sink, frame, write_timeout).await {
            Ok(()) => outcome.delivered += 1,
            Err(e) if e.is_expected() => {}
            Err(e) => {
                tracing::warn!("History replay to '{}' aborted: {}", id, e);
                outcome.aborted = true;
                break;
            }
        }
    }

    outcome
}
