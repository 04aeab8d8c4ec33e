//! Display helpers for export timestamps.

use chrono::{DateTime, Utc};

use crate::constants::MILLIS_THRESHOLD;

/// Interpret an export timestamp.
///
/// Exports mix seconds and milliseconds; values below 10^12 are taken as
/// seconds. Zero means "unknown" and yields `None`.
#[must_use]
pub fn timestamp_to_datetime(timestamp: i64) -> Option<DateTime<Utc>> {
    if timestamp == 0 {
        return None;
    }
    if timestamp.unsigned_abs() < MILLIS_THRESHOLD {
        DateTime::from_timestamp(timestamp, 0)
    } else {
        DateTime::from_timestamp_millis(timestamp)
    }
}

/// Format an export timestamp for display, e.g. `2023-11-14 22:13:20 UTC`.
#[must_use]
pub fn format_timestamp(timestamp: i64) -> Option<String> {
    timestamp_to_datetime(timestamp).map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}
