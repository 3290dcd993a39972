//! Connection registry
//!
//! The registry is the only owner of the set of live connections. Every
//! state-changing operation (join, leave, broadcast) is submitted through an
//! ordered channel to a single worker task, which executes them one at a
//! time in submission order. This gives:
//!
//! - persist-before-deliver: a broadcast is appended to the durable log
//!   before any member sees it, inside one operation;
//! - gap-free joins: a joining connection is registered and replayed before
//!   the next operation runs, so a concurrent broadcast is either part of
//!   its replay or delivered live, never both.
//!
//! Submission waits until the worker has room to accept the operation, not
//! until the operation has finished.

mod delivery;
mod operation;
mod persist;
mod replay;
mod worker;

#[cfg(test)]
pub(crate) mod testing;

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::domain::{
    ChatMessage, ConnectionId, ConnectionInfo, ConnectionSink, MessageLog, RegistryError,
};

use self::{operation::Operation, worker::Registry};

pub use persist::persist;
pub use replay::{ReplayOutcome, replay_history};

/// Capacity of the operation queue. One slot keeps submission close to a
/// rendezvous: a submitter waits while the worker is busy with an earlier
/// operation.
const OPERATION_QUEUE_CAPACITY: usize = 1;

/// Registry tuning
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryConfig {
    /// Upper bound for a single write (or close) to one connection.
    /// `None` waits as long as the peer takes.
    pub write_timeout: Option<Duration>,
}

/// Cloneable handle used by sessions to submit operations
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    operations: mpsc::Sender<Operation>,
}

/// Start the registry worker.
///
/// The returned task resolves when the registry shuts down (`Ok`) or halts
/// because a broadcast could not be persisted (`Err`).
pub fn spawn_registry(
    log: Arc<dyn MessageLog>,
    config: RegistryConfig,
) -> (RegistryHandle, JoinHandle<Result<(), RegistryError>>) {
    let (tx, rx) = mpsc::channel(OPERATION_QUEUE_CAPACITY);
    let worker = tokio::spawn(Registry::new(log, config).run(rx));
    (RegistryHandle { operations: tx }, worker)
}

impl RegistryHandle {
    /// Add a connection and replay the history to it
    pub async fn register(
        &self,
        info: ConnectionInfo,
        sink: Box<dyn ConnectionSink>,
    ) -> Result<(), RegistryError> {
        self.submit(Operation::Register { info, sink }).await
    }

    /// Remove a connection. Removing an absent connection is a no-op.
    pub async fn deregister(&self, id: ConnectionId) -> Result<(), RegistryError> {
        self.submit(Operation::Deregister { id }).await
    }

    /// Persist a message, then deliver it to every member
    pub async fn broadcast(&self, message: ChatMessage) -> Result<(), RegistryError> {
        self.submit(Operation::Broadcast { message }).await
    }

    /// Current members. Waits for the registry to answer, so every
    /// operation submitted earlier from the same task has completed.
    pub async fn connections(&self) -> Result<Vec<ConnectionInfo>, RegistryError> {
        let (reply, response) = oneshot::channel();
        self.submit(Operation::Connections { reply }).await?;
        response.await.map_err(|_| RegistryError::Closed)
    }

    /// Stop accepting operations and close every member
    pub async fn shutdown(&self) -> Result<(), RegistryError> {
        self.submit(Operation::Shutdown).await
    }

    /// Whether the worker has stopped
    pub fn is_closed(&self) -> bool {
        self.operations.is_closed()
    }

    async fn submit(&self, operation: Operation) -> Result<(), RegistryError> {
        self.operations
            .send(operation)
            .await
            .map_err(|_| RegistryError::Closed)
    }
}
