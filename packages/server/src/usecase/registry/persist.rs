use crate::domain::{ChatMessage, MessageLog, PersistError};

/// Encode `message` and append it to the tail of the durable log.
///
/// Returns the encoded frame so callers deliver exactly what was stored.
pub async fn persist(log: &dyn MessageLog, message: &ChatMessage) -> Result<String, PersistError> {
    let entry = message.encode()?;
    log.append(&entry).await?;
    Ok(entry)
}
