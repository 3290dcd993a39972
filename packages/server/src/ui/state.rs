//! Server state shared by the handlers.

use crate::usecase::RegistryHandle;

use super::origin::OriginPolicy;

/// Shared application state
pub struct AppState {
    /// Handle to the connection registry (the only way to touch the connection set)
    pub registry: RegistryHandle,
    /// Which browser origins may open a WebSocket
    pub origin_policy: OriginPolicy,
}
