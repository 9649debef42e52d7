//! Daybook planner - recurrence engine.
//!
//! Pure date arithmetic that expands an abstract recurrence rule
//! (daily/weekly/monthly/yearly/nth-weekday-of-month/specific-dates-of-month/
//! after-completion) into the concrete occurrence dates it implies inside a
//! requested window, and optionally into fully materialized task/event
//! instances. No I/O, no shared state; persistence and delivery of the
//! output belong to the caller.

pub mod error;
pub mod recur;
