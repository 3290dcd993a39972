//! UseCase: セッションのライフサイクル
//!
//! 1 接続ごとに「登録 → （読み込みループ） → 登録解除」を管理します。
//! 登録解除は [`Session::close`] で明示的に行いますが、早期リターンや panic で
//! `Session` が drop された場合もバックグラウンドで必ず登録解除されます。

use parlor_shared::time::now_millis;

use crate::domain::{ConnectionId, ConnectionInfo, ConnectionSink, RegistryError};

use super::registry::RegistryHandle;

/// A registered connection. Deregisters itself when closed or dropped.
#[derive(Debug)]
pub struct Session {
    registry: RegistryHandle,
    info: ConnectionInfo,
    released: bool,
}

impl Session {
    /// Register a new connection and replay the history to it
    pub async fn open(
        registry: RegistryHandle,
        sink: Box<dyn ConnectionSink>,
    ) -> Result<Self, RegistryError> {
        let info = ConnectionInfo {
            id: ConnectionId::new(),
            connected_at: now_millis(),
        };
        registry.register(info, sink).await?;

        Ok(Self {
            registry,
            info,
            released: false,
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.info.id
    }

    pub fn info(&self) -> ConnectionInfo {
        self.info
    }

    /// The registry this session is registered with
    pub fn registry(&self) -> &RegistryHandle {
        &self.registry
    }

    /// Deregister the connection and release its resources
    pub async fn close(mut self) {
        self.released = true;
        if let Err(e) = self.registry.deregister(self.info.id).await {
            tracing::debug!("Could not deregister '{}': {}", self.info.id, e);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let registry = self.registry.clone();
        let id = self.info.id;
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    if let Err(e) = registry.deregister(id).await {
                        tracing::debug!("Could not deregister '{}': {}", id, e);
                    }
                });
            }
            Err(_) => tracing::warn!("Session '{}' dropped outside of a runtime", id),
        }
    }
}
