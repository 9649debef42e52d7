//! Expansion algorithms for recurrence rules.

mod end;
mod exception;
mod materialize;
mod next;
mod nth_weekday;

pub use end::has_ended;
pub use exception::ExceptionSet;
pub use materialize::{
    Expansion, MAX_OCCURRENCES, expand_window, generate_dates, generate_event_instances,
    generate_task_instances,
};
pub use next::{next_after_completion, next_occurrence};
pub use nth_weekday::{days_in_month, nth_weekday_of};
