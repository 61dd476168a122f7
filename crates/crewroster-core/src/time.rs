//! Time helpers for rosters.
//!
//! This module provides [`DateRange`], the inclusive calendar-date range a
//! roster covers, and the small formatting helpers used by the iCal exporter.

use chrono::{DateTime, Duration, NaiveDate, Offset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// iCalendar UTC timestamp format (`YYYYMMDDTHHMMSSZ`).
pub const ICAL_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// An inclusive range of calendar dates `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First covered date.
    pub start: NaiveDate,
    /// Last covered date.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        assert!(start <= end, "DateRange start must be <= end");
        Self { start, end }
    }

    /// Creates a range of `days` days after `start` (inclusive of both ends).
    pub fn from_days(start: NaiveDate, days: i64) -> Self {
        Self::new(start, start + Duration::days(days.max(0)))
    }

    /// Checks if a date falls within the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Checks if `other` lies entirely within this range.
    pub fn contains_range(&self, other: &DateRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the smallest range covering both ranges.
    pub fn union(&self, other: &DateRange) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns the number of days covered.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Formats a UTC datetime as an iCalendar timestamp.
pub fn format_ical_timestamp(dt: DateTime<Utc>) -> String {
    dt.format(ICAL_TIMESTAMP_FORMAT).to_string()
}

/// Formats the UTC offset of an IANA timezone at the given instant as `+HH:MM`.
///
/// Returns `None` when the timezone name is not known.
pub fn format_utc_offset(timezone: &str, at: DateTime<Utc>) -> Option<String> {
    let tz: Tz = timezone.parse().ok()?;
    let seconds = at.with_timezone(&tz).offset().fix().local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    Some(format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60))
}

/// Formats a block time as `HH:MM`. Hours are not wrapped at 24.
pub fn format_block_time(block: Duration) -> String {
    let minutes = block.num_minutes();
    let sign = if minutes < 0 { "-" } else { "" };
    let minutes = minutes.abs();
    format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}
