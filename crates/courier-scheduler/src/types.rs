use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{Result, SchedulerError};

/// Primary key of a queued message, assigned by SQLite (`AUTOINCREMENT`).
pub type JobId = i64;

/// A persisted request to deliver one message at or after `scheduled_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledJob {
    pub id: JobId,
    /// Raw routable address or resolved user identifier.
    pub destination: String,
    /// Message text, delivered verbatim.
    pub body: String,
    pub scheduled_at: DateTime<Utc>,
    /// Flips to `true` once, after a confirmed send.
    pub sent: bool,
    pub created_at: DateTime<Utc>,
}

impl ScheduledJob {
    /// True when the job should be picked up by a poll at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.sent && self.scheduled_at <= now
    }
}

/// Encode a timestamp for storage.
///
/// Always UTC, always nine fractional digits, always `Z`: every encoded value
/// has the same width, so SQL string comparison matches chronological order.
pub fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// True when `ts` falls in UTC years 1 through 9999.
///
/// Outside that range the encoded form gains a sign or a fifth year digit and
/// no longer sorts with the rest of the column.
pub fn is_storable(ts: DateTime<Utc>) -> bool {
    (1..=9999).contains(&ts.year())
}

/// Like [`encode_ts`], but refuses timestamps that [`is_storable`] rejects.
pub fn encode_storable_ts(ts: DateTime<Utc>) -> Result<String> {
    let encoded = encode_ts(ts);
    if !is_storable(ts) {
        return Err(SchedulerError::InvalidTimestamp {
            value: encoded,
            reason: "year outside 1..=9999".to_string(),
        });
    }
    Ok(encoded)
}

/// Decode a timestamp written by [`encode_ts`].
pub fn decode_ts(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SchedulerError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
