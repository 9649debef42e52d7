//! Single-step occurrence calculation per rule kind.

use std::collections::BTreeSet;

use crate::recur::core::{CalendarDate, DateValue, RecurrenceKind, RecurrenceRule, Weekday};

use super::nth_weekday::{days_in_month, nth_weekday_of};

/// Computes the next occurrence strictly after `current`.
///
/// `current` must itself be a valid occurrence of the rule; this function
/// advances, it does not validate. Kinds whose next date the engine cannot
/// know (`AfterCompletion`, the legacy `Custom`) yield `None`.
#[must_use]
pub fn next_occurrence(rule: &RecurrenceRule, current: CalendarDate) -> Option<CalendarDate> {
    match rule.kind {
        RecurrenceKind::Daily => current.plus_days(i64::from(rule.interval)),
        RecurrenceKind::Weekly => next_weekly(rule, current),
        RecurrenceKind::Monthly => next_monthly(rule, current),
        RecurrenceKind::Yearly => next_yearly(rule, current),
        RecurrenceKind::AfterCompletion | RecurrenceKind::Custom => None,
    }
}

/// Schedules the occurrence that follows a completion event: the canonical
/// completion day plus the rule's offset.
///
/// `None` for any other rule kind or unparseable input. The range
/// materializer never calls this; it belongs to the caller's
/// task-completion workflow.
#[must_use]
pub fn next_after_completion(
    rule: &RecurrenceRule,
    completed_on: &DateValue,
) -> Option<CalendarDate> {
    if rule.kind != RecurrenceKind::AfterCompletion {
        return None;
    }
    let days = rule.days_after_completion?;
    completed_on.canonicalize()?.plus_days(i64::from(days))
}

/// Sunday that starts the week containing `date`.
fn week_start(date: CalendarDate) -> Option<CalendarDate> {
    date.plus_days(-i64::from(date.weekday_index()))
}

/// Whether `candidate` falls in a week aligned with `base`'s week under an
/// every-Nth-week interval. Weeks start on Sunday, matching the planner's
/// weekday numbering.
fn week_aligned(interval: u32, base: CalendarDate, candidate: CalendarDate) -> Option<bool> {
    let base_week = week_start(base)?;
    let candidate_week = week_start(candidate)?;
    let weeks = (candidate_week.civil() - base_week.civil()).num_days() / 7;
    Some(weeks % i64::from(interval) == 0)
}

fn listed(days_of_week: &BTreeSet<Weekday>, date: CalendarDate) -> bool {
    Weekday::from_index(date.weekday_index()).is_some_and(|weekday| days_of_week.contains(&weekday))
}

fn next_weekly(rule: &RecurrenceRule, current: CalendarDate) -> Option<CalendarDate> {
    let span = i64::from(7 * rule.interval);
    for offset in 1..=span {
        let candidate = current.plus_days(offset)?;
        if listed(&rule.days_of_week, candidate) && week_aligned(rule.interval, current, candidate)?
        {
            return Some(candidate);
        }
    }
    // Unreachable for a rule with a non-empty weekday set.
    current.plus_days(span)
}

/// First listed, phase-aligned day at or after `anchor` for a weekly rule.
/// The anchor's own week sets the phase.
pub(crate) fn first_weekly_on_or_after(
    rule: &RecurrenceRule,
    anchor: CalendarDate,
) -> Option<CalendarDate> {
    if listed(&rule.days_of_week, anchor) {
        return Some(anchor);
    }
    let span = i64::from(7 * rule.interval);
    for offset in 1..=span {
        let candidate = anchor.plus_days(offset)?;
        if listed(&rule.days_of_week, candidate) && week_aligned(rule.interval, anchor, candidate)? {
            return Some(candidate);
        }
    }
    // Unreachable once the rule has validated.
    Some(anchor)
}

/// Year/month `months` months after the given one, day-independent.
fn add_months(year: i32, month: u32, months: u32) -> (i32, u32) {
    let total = (month - 1) + months;
    (year.saturating_add_unsigned(total / 12), total % 12 + 1)
}

fn next_monthly(rule: &RecurrenceRule, current: CalendarDate) -> Option<CalendarDate> {
    if let Some(nth) = rule.nth_weekday {
        return next_monthly_nth(rule, nth.ordinal, nth.weekday, current);
    }
    if let Some(days) = &rule.month_days {
        return next_monthly_on_days(rule, days, current);
    }
    let day_of_month = u32::from(rule.day_of_month?);
    let (year, month) = add_months(current.year(), current.month(), rule.interval);
    // Clamp instead of skipping: day 31 in a 30-day month lands on the 30th.
    CalendarDate::new(year, month, day_of_month.min(days_in_month(year, month)))
}

fn next_monthly_nth(
    rule: &RecurrenceRule,
    ordinal: i8,
    weekday: Weekday,
    current: CalendarDate,
) -> Option<CalendarDate> {
    let mut ahead = rule.interval;
    // A "5th Tuesday" selector can miss several months in a row.
    for _ in 0..12 {
        let (year, month) = add_months(current.year(), current.month(), ahead);
        if let Some(date) = nth_weekday_of(year, month, ordinal, weekday) {
            return Some(date);
        }
        ahead += rule.interval;
    }
    None
}

fn next_monthly_on_days(
    rule: &RecurrenceRule,
    days: &BTreeSet<u8>,
    current: CalendarDate,
) -> Option<CalendarDate> {
    let later_this_month = days
        .iter()
        .map(|&day| u32::from(day))
        .find(|&day| day > current.day() && day <= days_in_month(current.year(), current.month()));
    if let Some(day) = later_this_month {
        return CalendarDate::new(current.year(), current.month(), day);
    }
    let (year, month) = add_months(current.year(), current.month(), rule.interval);
    let earliest = u32::from(*days.first()?);
    CalendarDate::new(year, month, earliest.min(days_in_month(year, month)))
}

fn next_yearly(rule: &RecurrenceRule, current: CalendarDate) -> Option<CalendarDate> {
    let year = current.year().saturating_add_unsigned(rule.interval);
    let month = u32::from(rule.month_of_year?);
    let day = u32::from(rule.day_of_month?);
    // Clamping covers the Feb-29 leap case and day-31 rules in short months.
    CalendarDate::new(year, month, day.min(days_in_month(year, month)))
}
