//! Millisecond timestamp conversions.
//!
//! Every timestamp is persisted as INTEGER epoch milliseconds, so all
//! comparisons between stored values happen at millisecond precision.

use chrono::{DateTime, Utc};

use super::errors::StoreError;
use super::StoreResult;

pub fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub fn from_millis(ms: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::invalid_record(format!("timestamp out of range: {ms}")))
}

pub fn from_optional_millis(ms: Option<i64>) -> StoreResult<Option<DateTime<Utc>>> {
    ms.map(from_millis).transpose()
}

/// Drop sub-millisecond precision so in-memory values compare like stored ones.
pub fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

/// Current time at storage precision
pub fn now_millis() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}
