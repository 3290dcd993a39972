//! Time-related utilities.

use chrono::{DateTime, Utc};

/// Get the current Unix timestamp in milliseconds (UTC)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to RFC 3339 format in UTC.
///
/// Returns `None` when the timestamp is outside the range chrono can represent.
pub fn millis_to_rfc3339(timestamp_millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis).map(|dt| dt.to_rfc3339())
}
