//! Window materialization: walking a rule forward across a date range.

use crate::recur::core::{
    CalendarDate, DateValue, EventInstance, EventTemplate, RecurrenceKind, RecurrenceRule,
    TaskInstance, TaskTemplate,
};

use super::end::has_ended;
use super::next::{first_weekly_on_or_after, next_occurrence};

/// Hard cap on occurrences emitted per call.
///
/// A safety valve against malformed or degenerate rules; hitting it
/// truncates the output instead of erroring.
pub const MAX_OCCURRENCES: usize = 1000;

/// Result of expanding a rule over a window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    /// Occurrence days in ascending order.
    pub dates: Vec<CalendarDate>,
    /// True when [`MAX_OCCURRENCES`] cut the walk short; the dates are
    /// still valid, just incomplete.
    pub truncated: bool,
}

/// Expands `rule` from its anchor across the inclusive window
/// `[window_start, window_end]`.
///
/// Deterministic and restartable: identical arguments yield identical
/// output. Malformed rules, unparseable dates, and the legacy `Custom`
/// kind all fail closed to an empty expansion; a recurrence anchored past
/// the window has not started yet and is likewise empty.
#[must_use]
pub fn expand_window(
    rule: &RecurrenceRule,
    anchor: &DateValue,
    window_start: &DateValue,
    window_end: &DateValue,
) -> Expansion {
    if let Err(err) = rule.validate() {
        tracing::debug!(kind = %rule.kind, error = %err, "rejecting malformed recurrence rule");
        return Expansion::default();
    }
    if rule.kind == RecurrenceKind::Custom {
        tracing::debug!("custom recurrence rules are recognized but never expanded");
        return Expansion::default();
    }
    let (Some(anchor), Some(start), Some(end)) = (
        anchor.canonicalize(),
        window_start.canonicalize(),
        window_end.canonicalize(),
    ) else {
        tracing::debug!(kind = %rule.kind, "unparseable anchor or window edge");
        return Expansion::default();
    };
    if anchor > end {
        return Expansion::default();
    }

    let Some(mut current) = first_occurrence(rule, anchor) else {
        return Expansion::default();
    };
    let mut emitted: u32 = 0;

    // Re-walk from the anchor up to the window so occurrence-count end
    // conditions resume with the correct running count. Excepted days are
    // skipped from the count exactly as they are from the output.
    while current < start {
        if has_ended(&rule.end, emitted, current) {
            return Expansion::default();
        }
        if !rule.exceptions.contains(current) {
            emitted += 1;
        }
        match next_occurrence(rule, current) {
            Some(next) => current = next,
            None => return Expansion::default(),
        }
    }

    let mut dates = Vec::new();
    let mut truncated = false;
    while current <= end {
        if has_ended(&rule.end, emitted, current) {
            break;
        }
        if dates.len() >= MAX_OCCURRENCES {
            truncated = true;
            break;
        }
        if !rule.exceptions.contains(current) {
            dates.push(current);
            emitted += 1;
        }
        match next_occurrence(rule, current) {
            Some(next) => current = next,
            None => break,
        }
    }

    Expansion { dates, truncated }
}

/// The first candidate at or after the anchor. Weekly anchors shift
/// forward to the first listed day in the anchor's phase; every other kind
/// starts on the anchor itself.
fn first_occurrence(rule: &RecurrenceRule, anchor: CalendarDate) -> Option<CalendarDate> {
    if rule.kind == RecurrenceKind::Weekly {
        first_weekly_on_or_after(rule, anchor)
    } else {
        Some(anchor)
    }
}

fn warn_if_truncated(rule: &RecurrenceRule, expansion: &Expansion) {
    if expansion.truncated {
        tracing::warn!(
            kind = %rule.kind,
            limit = MAX_OCCURRENCES,
            "recurrence expansion hit the occurrence cap; output truncated"
        );
    }
}

fn instance_id(parent_id: &str, date: CalendarDate) -> String {
    format!("{parent_id}_{date}")
}

/// Occurrence days for `rule` inside the window, e.g. for previewing a
/// recurrence before saving it.
#[must_use]
pub fn generate_dates(
    rule: &RecurrenceRule,
    anchor: &DateValue,
    window_start: &DateValue,
    window_end: &DateValue,
) -> Vec<CalendarDate> {
    let expansion = expand_window(rule, anchor, window_start, window_end);
    warn_if_truncated(rule, &expansion);
    expansion.dates
}

/// Materialized task instances for every occurrence inside the window.
#[must_use]
pub fn generate_task_instances(
    template: &TaskTemplate,
    rule: &RecurrenceRule,
    anchor: &DateValue,
    window_start: &DateValue,
    window_end: &DateValue,
) -> Vec<TaskInstance> {
    let expansion = expand_window(rule, anchor, window_start, window_end);
    warn_if_truncated(rule, &expansion);
    expansion
        .dates
        .iter()
        .map(|&date| task_instance(template, rule, date))
        .collect()
}

fn task_instance(template: &TaskTemplate, rule: &RecurrenceRule, date: CalendarDate) -> TaskInstance {
    let mut instance = TaskInstance {
        id: instance_id(&template.id, date),
        parent_id: template.id.clone(),
        title: template.title.clone(),
        description: template.description.clone(),
        status: template.status,
        scheduled_date: date,
        instance_date: date,
        generated: true,
    };
    if let Some(fields) = rule.overrides.get(&date) {
        if let Some(title) = &fields.title {
            instance.title = title.clone();
        }
        if let Some(description) = &fields.description {
            instance.description = Some(description.clone());
        }
        if let Some(status) = fields.status {
            instance.status = status;
        }
    }
    instance
}

/// Materialized event instances for every occurrence inside the window.
///
/// Each instance re-applies the template start's time-of-day on the
/// occurrence day and keeps the original duration, so a 2pm-3pm weekly
/// meeting stays 2pm-3pm on every generated date. A template whose start
/// or end cannot be read fails closed to no instances.
#[must_use]
pub fn generate_event_instances(
    template: &EventTemplate,
    rule: &RecurrenceRule,
    anchor: &DateValue,
    window_start: &DateValue,
    window_end: &DateValue,
) -> Vec<EventInstance> {
    let (Some(start_time), Some(end_time)) = (
        template.start_time.to_civil_datetime(),
        template.end_time.to_civil_datetime(),
    ) else {
        tracing::debug!(event = %template.id, "event template has unparseable start or end time");
        return Vec::new();
    };
    let duration = end_time - start_time;

    let expansion = expand_window(rule, anchor, window_start, window_end);
    warn_if_truncated(rule, &expansion);
    expansion
        .dates
        .iter()
        .map(|&date| {
            let start = date.civil().and_time(start_time.time());
            let end = start.checked_add_signed(duration).unwrap_or(start);
            event_instance(template, rule, date, start, end)
        })
        .collect()
}

fn event_instance(
    template: &EventTemplate,
    rule: &RecurrenceRule,
    date: CalendarDate,
    start_time: chrono::NaiveDateTime,
    end_time: chrono::NaiveDateTime,
) -> EventInstance {
    let mut instance = EventInstance {
        id: instance_id(&template.id, date),
        parent_id: template.id.clone(),
        title: template.title.clone(),
        description: template.description.clone(),
        start_time,
        end_time,
        scheduled_date: date,
        instance_date: date,
        generated: true,
    };
    if let Some(fields) = rule.overrides.get(&date) {
        if let Some(title) = &fields.title {
            instance.title = title.clone();
        }
        if let Some(description) = &fields.description {
            instance.description = Some(description.clone());
        }
    }
    instance
}
