//! The registry worker: sole owner of the connection set.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::mpsc;

use crate::domain::{
    ChatMessage, ConnectionId, ConnectionInfo, ConnectionSink, MessageLog, RegistryError,
};

use super::{
    RegistryConfig,
    delivery::{close_sink, write_frame},
    operation::Operation,
    persist::persist,
    replay::replay_history,
};

struct Member {
    info: ConnectionInfo,
    sink: Box<dyn ConnectionSink>,
}

pub(super) struct Registry {
    log: Arc<dyn MessageLog>,
    members: HashMap<ConnectionId, Member>,
    write_timeout: Option<Duration>,
}

impl Registry {
    pub(super) fn new(log: Arc<dyn MessageLog>, config: RegistryConfig) -> Self {
        Self {
            log,
            members: HashMap::new(),
            write_timeout: config.write_timeout,
        }
    }

    /// Execute operations one at a time until shutdown, until every handle
    /// is dropped, or until a broadcast fails to persist.
    pub(super) async fn run(
        mut self,
        mut operations: mpsc::Receiver<Operation>,
    ) -> Result<(), RegistryError> {
        tracing::debug!("Connection registry started");

        while let Some(operation) = operations.recv().await {
            match operation {
                Operation::Register { info, sink } => self.register(info, sink).await,
                Operation::Deregister { id } => self.deregister(id).await,
                Operation::Broadcast { message } => self.broadcast(&message).await?,
                Operation::Connections { reply } => {
                    let _ = reply.send(self.connections());
                }
                Operation::Shutdown => {
                    tracing::info!("Connection registry shutting down");
                    break;
                }
            }
        }

        operations.close();
        self.close_all().await;
        Ok(())
    }

    async fn register(&mut self, info: ConnectionInfo, mut sink: Box<dyn ConnectionSink>) {
        let outcome =
            replay_history(self.log.as_ref(), info.id, sink.as_mut(), self.write_timeout).await;
        self.members.insert(info.id, Member { info, sink });

        tracing::info!(
            "Connection '{}' registered ({} members, {} history entries replayed, {} skipped)",
            info.id,
            self.members.len(),
            outcome.delivered,
            outcome.skipped
        );
    }

    async fn deregister(&mut self, id: ConnectionId) {
        match self.members.remove(&id) {
            Some(mut member) => {
                close_sink(member.sink.as_mut(), self.write_timeout).await;
                tracing::info!(
                    "Connection '{}' deregistered ({} members)",
                    id,
                    self.members.len()
                );
            }
            None => tracing::debug!("Connection '{}' already removed", id),
        }
    }

    async fn broadcast(&mut self, message: &ChatMessage) -> Result<(), RegistryError> {
        let frame = match persist(self.log.as_ref(), message).await {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Refusing to deliver unpersisted message: {}", e);
                return Err(e.into());
            }
        };

        let write_timeout = self.write_timeout;
        let mut dead = Vec::new();
        for (id, member) in self.members.iter_mut() {
            match write_frame(member.sink.as_mut(), frame.clone(), write_timeout).await {
                Ok(()) => {}
                Err(e) if e.is_expected() => {}
                Err(e) => {
                    tracing::warn!("Dropping connection '{}': {}", id, e);
                    dead.push(*id);
                }
            }
        }

        for id in &dead {
            if let Some(mut member) = self.members.remove(id) {
                close_sink(member.sink.as_mut(), write_timeout).await;
            }
        }

        tracing::debug!(
            "Broadcast from '{}' delivered to {} members ({} dropped)",
            message.username,
            self.members.len(),
            dead.len()
        );
        Ok(())
    }

    fn connections(&self) -> Vec<ConnectionInfo> {
        let mut connections: Vec<ConnectionInfo> =
            self.members.values().map(|member| member.info).collect();
        connections.sort_by_key(|info| (info.connected_at, info.id));
        connections
    }

    async fn close_all(&mut self) {
        for (_, mut member) in self.members.drain() {
            close_sink(member.sink.as_mut(), self.write_timeout).await;
        }
    }
}
