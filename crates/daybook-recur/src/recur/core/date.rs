//! Canonical calendar days and the date representations the planner stores.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use daybook_core::error::CoreError;
use serde::{Deserialize, Serialize};

/// A single Gregorian calendar day, independent of timezone and source
/// representation.
///
/// Two values are equal iff they denote the same day, however they were
/// constructed. Ordering matches lexicographic order of the canonical
/// zero-padded `YYYY-MM-DD` string, which is also the `Display` and serde
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Creates a date from civil components, `None` when out of range.
    #[must_use]
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Wraps an already-civil date.
    #[must_use]
    pub const fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The comparable civil value backing this day.
    #[must_use]
    pub const fn civil(self) -> NaiveDate {
        self.0
    }

    /// This day at civil midnight, for time-of-day arithmetic.
    #[must_use]
    pub fn at_midnight(self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Month number (1-12).
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Day of month (1-31).
    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// Weekday index as the planner stores it (0 = Sunday .. 6 = Saturday).
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "num_days_from_sunday is 0-6, truncation to u8 is safe"
    )]
    pub fn weekday_index(self) -> u8 {
        self.0.weekday().num_days_from_sunday() as u8
    }

    /// The day `days` later (earlier when negative), `None` when the result
    /// leaves chrono's representable range.
    #[must_use]
    pub fn plus_days(self, days: i64) -> Option<Self> {
        self.0.checked_add_signed(TimeDelta::days(days)).map(Self)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl std::str::FromStr for CalendarDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|err| CoreError::ParseError(format!("invalid calendar date {s:?}: {err}")))
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

/// Datastore-native timestamp value: seconds and nanoseconds since the Unix
/// epoch, the shape the document store serializes instants in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    #[must_use]
    pub const fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Converts to a UTC datetime, `None` when out of chrono's range.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            seconds: value.timestamp(),
            nanos: value.timestamp_subsec_nanos(),
        }
    }
}

/// A date in any of the representations the planner's storage layer
/// produces: a datastore timestamp object, an ISO-8601 string with or
/// without time and offset, or a bare `YYYY-MM-DD` day string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Timestamp(Timestamp),
    Text(String),
}

impl DateValue {
    /// Canonicalizes this value to the calendar day it was written to mean.
    ///
    /// Values carrying a time keep the civil date of their own clock: an
    /// offset-bearing string contributes the date in that offset, never the
    /// date re-derived through UTC (which shifts the day for callers west
    /// of UTC). Bare timestamps have no civil clock and are read as UTC
    /// days. Unparseable input yields `None`, never a panic.
    #[must_use]
    pub fn canonicalize(&self) -> Option<CalendarDate> {
        self.to_civil_datetime()
            .map(|dt| CalendarDate::from_naive(dt.date()))
    }

    /// The civil datetime this value was written to mean, at midnight for
    /// day-only input. `None` for unparseable input.
    #[must_use]
    pub fn to_civil_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => ts.to_datetime().map(|dt| dt.naive_utc()),
            Self::Text(text) => parse_civil(text),
        }
    }
}

fn parse_civil(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    // Offset-carrying strings keep the clock of their own offset.
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

impl From<Timestamp> for DateValue {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<DateTime<Utc>> for DateValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(Timestamp::from(value))
    }
}

impl From<NaiveDate> for DateValue {
    fn from(value: NaiveDate) -> Self {
        Self::Text(value.format("%Y-%m-%d").to_string())
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Text(value.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
    }
}

impl From<CalendarDate> for DateValue {
    fn from(value: CalendarDate) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&str> for DateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DateValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Whether two values denote the same calendar day.
///
/// Unparseable input never equals anything, itself included.
#[must_use]
pub fn same_day(a: &DateValue, b: &DateValue) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
