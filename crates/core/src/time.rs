//! UTC epoch-millisecond helpers.

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::{TimeError, TimeResult};

/// Current instant in UTC epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parses a base-10 epoch-millisecond value, naming `field` in the error.
pub fn parse_epoch_millis(field: &str, raw: &str) -> TimeResult<i64> {
    raw.parse::<i64>().map_err(|_| {
        TimeError::Validation(format!("{field} must be an integer epoch millisecond value, got {raw:?}"))
    })
}

/// The UTC calendar day containing `millis`, or `None` if chrono cannot
/// represent the instant.
pub fn utc_day(millis: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|instant| instant.date_naive())
}

/// Picks the reference instant for an overlap query.
///
/// Positive values are used as-is; zero and negative values mean "now".
pub fn resolve_reference_instant(requested: i64) -> i64 {
    if requested > 0 { requested } else { now_millis() }
}
