//! Half-open time windows and timestamp parsing.

use crate::error::{DataError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use polars::prelude::TimeUnit;
use std::fmt;

/// Formats accepted for textual timestamps, tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Date-only format.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    /// Inclusive lower bound
    pub start: NaiveDateTime,
    /// Exclusive upper bound
    pub end: NaiveDateTime,
}

impl Window {
    /// Create a new window.
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Whether `ts` falls in `[start, end)`.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Length of the window.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// True when no instant can fall inside the window.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Parse a textual timestamp.
///
/// Accepts RFC 3339 (converted to UTC), `YYYY-MM-DD HH:MM:SS[.f]`,
/// `YYYY-MM-DDTHH:MM:SS[.f]`, minute precision variants, and plain
/// `YYYY-MM-DD` (midnight). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Convert a raw epoch value in the given polars time unit.
pub(crate) fn from_epoch(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value).naive_utc()),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value).map(|dt| dt.naive_utc()),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value).map(|dt| dt.naive_utc()),
    }
}

/// Convert days since the Unix epoch (polars `Date` physical value).
pub(crate) fn from_epoch_days(days: i32) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(i64::from(days) * 86_400, 0).map(|dt| dt.naive_utc())
}

/// Days since the Unix epoch for a timestamp's calendar date.
pub(crate) fn to_epoch_days(ts: NaiveDateTime) -> i32 {
    let epoch = DateTime::<Utc>::UNIX_EPOCH.date_naive();
    (ts.date() - epoch).num_days() as i32
}

/// Something that can be used as a window bound.
pub trait IntoTimestamp {
    /// Resolve to a concrete timestamp.
    fn into_timestamp(self) -> Result<NaiveDateTime>;
}

impl IntoTimestamp for NaiveDateTime {
    fn into_timestamp(self) -> Result<NaiveDateTime> {
        Ok(self)
    }
}

impl IntoTimestamp for NaiveDate {
    fn into_timestamp(self) -> Result<NaiveDateTime> {
        Ok(self.and_time(NaiveTime::MIN))
    }
}

impl IntoTimestamp for &str {
    fn into_timestamp(self) -> Result<NaiveDateTime> {
        parse_timestamp(self).ok_or_else(|| DataError::InvalidTimestamp {
            column: "<bound>".to_string(),
            value: self.to_string(),
        })
    }
}

impl IntoTimestamp for &String {
    fn into_timestamp(self) -> Result<NaiveDateTime> {
        self.as_str().into_timestamp()
    }
}

impl IntoTimestamp for String {
    fn into_timestamp(self) -> Result<NaiveDateTime> {
        self.as_str().into_timestamp()
    }
}
