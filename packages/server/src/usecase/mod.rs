//! UseCase layer
//!
//! - `registry`: 接続集合を唯一所有するアクター（Register / Deregister / Broadcast / Shutdown）
//! - `session`: 1 接続分の参加〜離脱のライフサイクル

pub mod registry;
pub mod session;

pub use registry::{RegistryConfig, RegistryHandle, spawn_registry};
pub use session::Session;
