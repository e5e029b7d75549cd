use chrono::{DateTime, Utc};

/// Current wall-clock time as epoch milliseconds, the storage
/// representation used across all tables.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a stored epoch-millisecond timestamp into a UTC datetime.
/// Out-of-range values fall back to the epoch rather than failing.
pub fn to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}
