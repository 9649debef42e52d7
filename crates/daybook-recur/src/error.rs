use thiserror::Error;

/// Recurrence rule validation and expansion errors
#[derive(Error, Debug)]
pub enum RecurError {
    #[error("Interval must be at least 1")]
    ZeroInterval,

    #[error("Weekly rule requires at least one weekday")]
    MissingWeekdays,

    #[error("Monthly rule requires a day of month, an nth-weekday, or specific month days")]
    MissingMonthlyForm,

    #[error("Monthly rule mixes day-of-month, nth-weekday, and specific-days forms")]
    ConflictingMonthlyForms,

    #[error("Day of month out of range: {0}")]
    InvalidDayOfMonth(u8),

    #[error("Month out of range: {0}")]
    InvalidMonth(u8),

    #[error("Yearly rule requires a month")]
    MissingMonth,

    #[error("Yearly rule requires a day of month")]
    MissingDayOfMonth,

    #[error("Nth-weekday ordinal out of range: {0} (1-5 or -1 for last)")]
    InvalidOrdinal(i8),

    #[error("Weekday index out of range: {0}")]
    InvalidWeekday(u8),

    #[error("After-completion rule requires a positive day offset")]
    MissingCompletionOffset,

    #[error(transparent)]
    Core(#[from] daybook_core::error::CoreError),
}

pub type RecurResult<T> = std::result::Result<T, RecurError>;
