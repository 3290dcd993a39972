//! Error types for the domain and usecase layers.

use thiserror::Error;

/// JSON encode/decode failure
#[derive(Debug, Error)]
#[error("Invalid chat message encoding: {0}")]
pub struct CodecError(#[from] serde_json::Error);

/// Durable log backend failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogError {
    #[error("Message log unavailable: {0}")]
    Unavailable(String),

    #[error("Message log backend error: {0}")]
    Backend(String),
}

/// A message could not be durably recorded
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to encode message: {0}")]
    Encode(#[from] CodecError),

    #[error("Failed to append message: {0}")]
    Append(#[from] LogError),
}

/// Errors surfaced by the connection registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry no longer accepts operations (shut down or halted)
    #[error("Connection registry is closed")]
    Closed,

    /// A broadcast could not be persisted; the registry halts
    #[error("Connection registry halted: {0}")]
    Persist(#[from] PersistError),
}
