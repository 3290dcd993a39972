use std::fmt;

use tokio::sync::oneshot;

use crate::domain::{ChatMessage, ConnectionId, ConnectionInfo, ConnectionSink};

/// An operation executed by the registry worker
pub(crate) enum Operation {
    Register {
        info: ConnectionInfo,
        sink: Box<dyn ConnectionSink>,
    },
    Deregister {
        id: ConnectionId,
    },
    Broadcast {
        message: ChatMessage,
    },
    Connections {
        reply: oneshot::Sender<Vec<ConnectionInfo>>,
    },
    Shutdown,
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register { info, .. } => f.debug_struct("Register").field("info", info).finish(),
            Self::Deregister { id } => f.debug_struct("Deregister").field("id", id).finish(),
            Self::Broadcast { message } => f
                .debug_struct("Broadcast")
                .field("message", message)
                .finish(),
            Self::Connections { .. } => f.write_str("Connections"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}
