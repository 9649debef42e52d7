//! Value types for the recurrence engine.

mod date;
mod item;
mod rule;

pub use date::{CalendarDate, DateValue, Timestamp, same_day};
pub use item::{EventInstance, EventTemplate, TaskInstance, TaskTemplate};
pub use rule::{
    EndCondition, InstanceOverride, NthWeekday, RecurrenceKind, RecurrenceRule, Weekday,
};
