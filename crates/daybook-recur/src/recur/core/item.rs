//! Item templates and their materialized occurrence instances.

use chrono::NaiveDateTime;
use daybook_core::types::ItemStatus;
use serde::{Deserialize, Serialize};

use super::date::{CalendarDate, DateValue};
use super::rule::RecurrenceRule;

/// Template fields of a recurring task, as the originating item stores
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    /// The task's scheduled day, which anchors its recurrence.
    #[serde(default)]
    pub scheduled_date: Option<DateValue>,
    /// Embedded rule; never copied onto instances.
    #[serde(default)]
    pub rule: Option<RecurrenceRule>,
}

impl TaskTemplate {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: ItemStatus::Pending,
            scheduled_date: None,
            rule: None,
        }
    }
}

/// A single generated task occurrence.
///
/// Instances are produced on demand for a window and never persisted by
/// the engine; they carry no rule of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInstance {
    /// Derived identifier: `{parent_id}_{canonical day}`.
    pub id: String,
    pub parent_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: ItemStatus,
    pub scheduled_date: CalendarDate,
    pub instance_date: CalendarDate,
    /// Marks the instance as engine-generated rather than stored.
    pub generated: bool,
}

/// Template fields of a recurring event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Start of the originating occurrence; its time-of-day is re-applied
    /// to every generated day.
    pub start_time: DateValue,
    /// End of the originating occurrence; with `start_time` it fixes the
    /// duration every instance keeps.
    pub end_time: DateValue,
    /// Embedded rule; never copied onto instances.
    #[serde(default)]
    pub rule: Option<RecurrenceRule>,
}

impl EventTemplate {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_time: impl Into<DateValue>,
        end_time: impl Into<DateValue>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            start_time: start_time.into(),
            end_time: end_time.into(),
            rule: None,
        }
    }
}

/// A single generated event occurrence, timed by re-applying the
/// template's time-of-day and duration on the occurrence day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInstance {
    /// Derived identifier: `{parent_id}_{canonical day}`.
    pub id: String,
    pub parent_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub scheduled_date: CalendarDate,
    pub instance_date: CalendarDate,
    /// Marks the instance as engine-generated rather than stored.
    pub generated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_template_deserializes_sparse_document() {
        let json = r#"{"id": "task-1", "title": "Water the plants"}"#;
        let template: TaskTemplate = serde_json::from_str(json).expect("deserializes");
        assert_eq!(template.status, ItemStatus::Pending);
        assert!(template.rule.is_none());
        assert!(template.scheduled_date.is_none());
    }

    #[test]
    fn event_template_carries_times() {
        let template = EventTemplate::new(
            "evt-1",
            "Standup",
            "2026-02-02T14:00:00Z",
            "2026-02-02T15:00:00Z",
        );
        assert!(template.start_time.to_civil_datetime().is_some());
        assert!(template.end_time.to_civil_datetime().is_some());
    }
}
