//! End-condition evaluation for recurrence walks.

use crate::recur::core::{CalendarDate, EndCondition};

/// Whether a recurrence has terminated at `candidate`.
///
/// `emitted` is the count of occurrences already generated, not including
/// the candidate under test. A by-date condition whose end date cannot be
/// canonicalized ends nothing: invalidity propagates instead of guessing
/// at a boundary.
#[must_use]
pub fn has_ended(end: &EndCondition, emitted: u32, candidate: CalendarDate) -> bool {
    match end {
        EndCondition::Never => false,
        EndCondition::OnDate { date } => date
            .canonicalize()
            .is_some_and(|end_date| candidate > end_date),
        EndCondition::AfterOccurrences { count } => emitted >= *count,
    }
}
