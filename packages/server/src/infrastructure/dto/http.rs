//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::ConnectionInfo;
use parlor_shared::time::millis_to_rfc3339;

/// Response of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    /// Number of live connections
    pub connections: usize,
}

/// One entry of `GET /debug/connections`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDetailDto {
    pub id: String,
    /// RFC 3339 timestamp of registration
    pub connected_at: String,
}

impl From<ConnectionInfo> for ConnectionDetailDto {
    fn from(info: ConnectionInfo) -> Self {
        Self {
            id: info.id.to_string(),
            connected_at: millis_to_rfc3339(info.connected_at)
                .unwrap_or_else(|| info.connected_at.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionId;

    #[test]
    fn test_connection_info_to_dto() {
        // テスト項目: ConnectionInfo が RFC 3339 形式の DTO に変換される
        // given (前提条件):
        let info = ConnectionInfo {
            id: ConnectionId::new(),
            connected_at: 1_672_531_200_000,
        };

        // when (操作):
        let dto: ConnectionDetailDto = info.into();

        // then (期待する結果):
        assert_eq!(dto.id, info.id.to_string());
        assert_eq!(dto.connected_at, "2023-01-01T00:00:00+00:00");
    }
}
