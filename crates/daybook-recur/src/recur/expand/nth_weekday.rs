//! "Nth weekday of the month" resolution.

use chrono::{Datelike, NaiveDate};

use crate::recur::core::{CalendarDate, NthWeekday, Weekday};

/// Returns the number of days in a month.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .or_else(|| NaiveDate::from_ymd_opt(year + 1, 1, 1))
        .map_or(31, |d| d.pred_opt().map_or(31, |p| p.day()))
}

/// Resolves "the nth (or last) `weekday` of `year`-`month`".
///
/// An ordinal of 1-5 counts from the month's first matching day; a month
/// without a 5th occurrence resolves to `None` rather than spilling into
/// the next month. [`NthWeekday::LAST`] walks back from the month's final
/// day. An out-of-range ordinal or month resolves to `None`.
#[must_use]
pub fn nth_weekday_of(
    year: i32,
    month: u32,
    ordinal: i8,
    weekday: Weekday,
) -> Option<CalendarDate> {
    if !(1..=12).contains(&month) || !NthWeekday::new(ordinal, weekday).is_valid() {
        return None;
    }

    let target = u32::from(weekday.index());
    let last_day = days_in_month(year, month);

    if ordinal == NthWeekday::LAST {
        let last = CalendarDate::new(year, month, last_day)?;
        let back = (u32::from(last.weekday_index()) + 7 - target) % 7;
        return CalendarDate::new(year, month, last_day - back);
    }

    let first = CalendarDate::new(year, month, 1)?;
    let forward = (target + 7 - u32::from(first.weekday_index())) % 7;
    let day = 1 + forward + (u32::try_from(ordinal).ok()? - 1) * 7;
    if day > last_day {
        return None;
    }
    CalendarDate::new(year, month, day)
}
