//! Recurrence rules: how occurrences repeat and when they stop.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use daybook_core::types::ItemStatus;
use serde::{Deserialize, Serialize};

use crate::error::{RecurError, RecurResult};
use crate::recur::expand::ExceptionSet;

use super::date::{CalendarDate, DateValue};

/// Day of the week, numbered the way the planner stores it (0 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Parses a planner weekday index (0 = Sunday .. 6 = Saturday).
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => Self::Sunday,
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            6 => Self::Saturday,
            _ => return None,
        })
    }

    /// The planner index (0 = Sunday .. 6 = Saturday).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
        }
    }

    /// Returns all weekdays in order (Sunday through Saturday).
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Sunday,
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
        ]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Weekday {
    type Error = RecurError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value).ok_or(RecurError::InvalidWeekday(value))
    }
}

impl From<Weekday> for u8 {
    fn from(value: Weekday) -> Self {
        value.index()
    }
}

/// How a rule repeats.
///
/// Closed set; `Custom` is a legacy kind that is recognized but never
/// expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    AfterCompletion,
    Custom,
}

impl RecurrenceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::AfterCompletion => "after_completion",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// "Nth weekday of the month" selector.
///
/// `ordinal` counts 1-5 from the start of the month, or [`NthWeekday::LAST`]
/// for the final occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NthWeekday {
    pub ordinal: i8,
    pub weekday: Weekday,
}

impl NthWeekday {
    /// Ordinal selecting the last occurrence in the month.
    pub const LAST: i8 = -1;

    #[must_use]
    pub const fn new(ordinal: i8, weekday: Weekday) -> Self {
        Self { ordinal, weekday }
    }

    /// Selector for the last occurrence of `weekday` in a month.
    #[must_use]
    pub const fn last(weekday: Weekday) -> Self {
        Self::new(Self::LAST, weekday)
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.ordinal == Self::LAST || (self.ordinal >= 1 && self.ordinal <= 5)
    }
}

/// When a recurrence stops producing occurrences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EndCondition {
    /// Runs forever.
    #[default]
    Never,
    /// Last occurrence on or before this day (inclusive).
    OnDate { date: DateValue },
    /// Stops once this many occurrences have been generated.
    AfterOccurrences { count: u32 },
}

/// Field overrides applied to a single materialized occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceOverride {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ItemStatus>,
}

/// Describes how a planner item repeats.
///
/// A rule that fails [`RecurrenceRule::validate`] produces no occurrences:
/// malformed patterns fail closed instead of crashing a calendar
/// enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub kind: RecurrenceKind,

    /// Every N days/weeks/months/years (at least 1).
    #[serde(default = "default_interval")]
    pub interval: u32,

    /// Weekdays a weekly rule fires on; required non-empty for weekly.
    #[serde(default)]
    pub days_of_week: BTreeSet<Weekday>,

    /// Day of month (1-31) for monthly and yearly rules.
    #[serde(default)]
    pub day_of_month: Option<u8>,

    /// Month (1-12), required for yearly rules.
    #[serde(default)]
    pub month_of_year: Option<u8>,

    /// "2nd Tuesday"-style monthly selector; exclusive with `day_of_month`
    /// and `month_days`.
    #[serde(default)]
    pub nth_weekday: Option<NthWeekday>,

    /// Specific days of the month (e.g. the 1st and the 15th); exclusive
    /// with `day_of_month` and `nth_weekday`.
    #[serde(default)]
    pub month_days: Option<BTreeSet<u8>>,

    /// Offset for after-completion rules. The next occurrence follows a
    /// completion event the engine does not see, so expansion stops at the
    /// anchor for this kind.
    #[serde(default)]
    pub days_after_completion: Option<u32>,

    #[serde(default)]
    pub end: EndCondition,

    /// Days excluded from the recurrence.
    #[serde(default)]
    pub exceptions: ExceptionSet,

    /// Per-day field overrides for materialized instances.
    #[serde(default)]
    pub overrides: BTreeMap<CalendarDate, InstanceOverride>,
}

fn default_interval() -> u32 {
    1
}

impl RecurrenceRule {
    fn base(kind: RecurrenceKind) -> Self {
        Self {
            kind,
            interval: 1,
            days_of_week: BTreeSet::new(),
            day_of_month: None,
            month_of_year: None,
            nth_weekday: None,
            month_days: None,
            days_after_completion: None,
            end: EndCondition::Never,
            exceptions: ExceptionSet::new(),
            overrides: BTreeMap::new(),
        }
    }

    /// Creates a daily rule.
    #[must_use]
    pub fn daily() -> Self {
        Self::base(RecurrenceKind::Daily)
    }

    /// Creates a weekly rule firing on the given weekdays.
    #[must_use]
    pub fn weekly<I>(days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        Self {
            days_of_week: days.into_iter().collect(),
            ..Self::base(RecurrenceKind::Weekly)
        }
    }

    /// Creates a monthly rule on a fixed day of month.
    #[must_use]
    pub fn monthly(day_of_month: u8) -> Self {
        Self {
            day_of_month: Some(day_of_month),
            ..Self::base(RecurrenceKind::Monthly)
        }
    }

    /// Creates a monthly rule on the nth (or last) weekday of the month.
    #[must_use]
    pub fn monthly_nth(nth: NthWeekday) -> Self {
        Self {
            nth_weekday: Some(nth),
            ..Self::base(RecurrenceKind::Monthly)
        }
    }

    /// Creates a monthly rule on specific days of the month.
    #[must_use]
    pub fn monthly_on<I>(days: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        Self {
            month_days: Some(days.into_iter().collect()),
            ..Self::base(RecurrenceKind::Monthly)
        }
    }

    /// Creates a yearly rule.
    #[must_use]
    pub fn yearly(month_of_year: u8, day_of_month: u8) -> Self {
        Self {
            month_of_year: Some(month_of_year),
            day_of_month: Some(day_of_month),
            ..Self::base(RecurrenceKind::Yearly)
        }
    }

    /// Creates an after-completion rule.
    #[must_use]
    pub fn after_completion(days: u32) -> Self {
        Self {
            days_after_completion: Some(days),
            ..Self::base(RecurrenceKind::AfterCompletion)
        }
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Ends the recurrence on a given day (inclusive).
    #[must_use]
    pub fn ending_on(mut self, date: impl Into<DateValue>) -> Self {
        self.end = EndCondition::OnDate { date: date.into() };
        self
    }

    /// Ends the recurrence after a number of occurrences.
    #[must_use]
    pub fn ending_after(mut self, count: u32) -> Self {
        self.end = EndCondition::AfterOccurrences { count };
        self
    }

    /// Excludes a day from the recurrence.
    #[must_use]
    pub fn with_exception(mut self, date: impl Into<DateValue>) -> Self {
        self.exceptions.insert(&date.into());
        self
    }

    /// Overrides instance fields for one occurrence day.
    #[must_use]
    pub fn with_override(mut self, date: CalendarDate, fields: InstanceOverride) -> Self {
        self.overrides.insert(date, fields);
        self
    }

    /// Checks the structural invariants for this rule's kind.
    ///
    /// ## Errors
    /// Returns the first violated invariant. The expansion entry points
    /// treat any violation as "no occurrences".
    pub fn validate(&self) -> RecurResult<()> {
        if self.interval == 0 {
            return Err(RecurError::ZeroInterval);
        }
        match self.kind {
            RecurrenceKind::Daily | RecurrenceKind::Custom => Ok(()),
            RecurrenceKind::Weekly => {
                if self.days_of_week.is_empty() {
                    return Err(RecurError::MissingWeekdays);
                }
                Ok(())
            }
            RecurrenceKind::Monthly => self.validate_monthly(),
            RecurrenceKind::Yearly => {
                let month = self.month_of_year.ok_or(RecurError::MissingMonth)?;
                if !(1..=12).contains(&month) {
                    return Err(RecurError::InvalidMonth(month));
                }
                let day = self.day_of_month.ok_or(RecurError::MissingDayOfMonth)?;
                if !(1..=31).contains(&day) {
                    return Err(RecurError::InvalidDayOfMonth(day));
                }
                Ok(())
            }
            RecurrenceKind::AfterCompletion => match self.days_after_completion {
                Some(days) if days >= 1 => Ok(()),
                _ => Err(RecurError::MissingCompletionOffset),
            },
        }
    }

    fn validate_monthly(&self) -> RecurResult<()> {
        let forms = usize::from(self.day_of_month.is_some())
            + usize::from(self.nth_weekday.is_some())
            + usize::from(self.month_days.is_some());
        if forms == 0 {
            return Err(RecurError::MissingMonthlyForm);
        }
        if forms > 1 {
            return Err(RecurError::ConflictingMonthlyForms);
        }
        if let Some(day) = self.day_of_month
            && !(1..=31).contains(&day)
        {
            return Err(RecurError::InvalidDayOfMonth(day));
        }
        if let Some(nth) = self.nth_weekday
            && !nth.is_valid()
        {
            return Err(RecurError::InvalidOrdinal(nth.ordinal));
        }
        if let Some(days) = &self.month_days {
            if days.is_empty() {
                return Err(RecurError::MissingMonthlyForm);
            }
            if let Some(&bad) = days.iter().find(|day| !(1..=31).contains(*day)) {
                return Err(RecurError::InvalidDayOfMonth(bad));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_index_round_trip() {
        for weekday in Weekday::all() {
            assert_eq!(Weekday::from_index(weekday.index()), Some(weekday));
        }
        assert_eq!(Weekday::from_index(7), None);
    }

    #[test]
    fn builders_validate() {
        assert!(RecurrenceRule::daily().validate().is_ok());
        assert!(
            RecurrenceRule::weekly([Weekday::Monday, Weekday::Wednesday])
                .validate()
                .is_ok()
        );
        assert!(RecurrenceRule::monthly(31).validate().is_ok());
        assert!(
            RecurrenceRule::monthly_nth(NthWeekday::new(2, Weekday::Tuesday))
                .validate()
                .is_ok()
        );
        assert!(RecurrenceRule::monthly_on([1, 15]).validate().is_ok());
        assert!(RecurrenceRule::yearly(2, 29).validate().is_ok());
        assert!(RecurrenceRule::after_completion(3).validate().is_ok());
    }

    #[test]
    fn zero_interval_rejected() {
        let rule = RecurrenceRule::daily().with_interval(0);
        assert!(matches!(rule.validate(), Err(RecurError::ZeroInterval)));
    }

    #[test]
    fn weekly_requires_days() {
        let rule = RecurrenceRule::weekly([]);
        assert!(matches!(rule.validate(), Err(RecurError::MissingWeekdays)));
    }

    #[test]
    fn monthly_forms_are_exclusive() {
        let mut rule = RecurrenceRule::monthly(15);
        rule.nth_weekday = Some(NthWeekday::new(1, Weekday::Friday));
        assert!(matches!(
            rule.validate(),
            Err(RecurError::ConflictingMonthlyForms)
        ));

        let rule = RecurrenceRule::base(RecurrenceKind::Monthly);
        assert!(matches!(
            rule.validate(),
            Err(RecurError::MissingMonthlyForm)
        ));
    }

    #[test]
    fn monthly_day_range_checked() {
        let rule = RecurrenceRule::monthly(32);
        assert!(matches!(
            rule.validate(),
            Err(RecurError::InvalidDayOfMonth(32))
        ));

        let rule = RecurrenceRule::monthly_on([0, 15]);
        assert!(matches!(
            rule.validate(),
            Err(RecurError::InvalidDayOfMonth(0))
        ));
    }

    #[test]
    fn nth_ordinal_range_checked() {
        let rule = RecurrenceRule::monthly_nth(NthWeekday::new(6, Weekday::Monday));
        assert!(matches!(rule.validate(), Err(RecurError::InvalidOrdinal(6))));

        let rule = RecurrenceRule::monthly_nth(NthWeekday::new(0, Weekday::Monday));
        assert!(matches!(rule.validate(), Err(RecurError::InvalidOrdinal(0))));

        let rule = RecurrenceRule::monthly_nth(NthWeekday::last(Weekday::Friday));
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn yearly_requires_month_and_day() {
        let mut rule = RecurrenceRule::yearly(13, 1);
        assert!(matches!(rule.validate(), Err(RecurError::InvalidMonth(13))));

        rule = RecurrenceRule::yearly(6, 15);
        rule.month_of_year = None;
        assert!(matches!(rule.validate(), Err(RecurError::MissingMonth)));
    }

    #[test]
    fn after_completion_requires_offset() {
        let rule = RecurrenceRule::after_completion(0);
        assert!(matches!(
            rule.validate(),
            Err(RecurError::MissingCompletionOffset)
        ));
    }

    #[test]
    fn rule_serde_round_trip() {
        let rule = RecurrenceRule::weekly([Weekday::Monday, Weekday::Friday])
            .with_interval(2)
            .ending_after(10)
            .with_exception("2026-02-09")
            .with_override(
                "2026-02-13".parse().expect("valid date"),
                InstanceOverride {
                    title: Some("Moved standup".to_string()),
                    ..InstanceOverride::default()
                },
            );

        let json = serde_json::to_string(&rule).expect("serializes");
        let back: RecurrenceRule = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, rule);
    }

    #[test]
    fn rule_deserializes_sparse_document() {
        // Documents written before newer fields existed omit them entirely.
        let json = r#"{"kind": "daily", "days_of_week": [0, 6]}"#;
        let rule: RecurrenceRule = serde_json::from_str(json).expect("deserializes");
        assert_eq!(rule.kind, RecurrenceKind::Daily);
        assert_eq!(rule.interval, 1);
        assert!(rule.days_of_week.contains(&Weekday::Sunday));
        assert!(rule.days_of_week.contains(&Weekday::Saturday));
        assert_eq!(rule.end, EndCondition::Never);
    }

    #[test]
    fn weekday_serializes_as_index() {
        let json = serde_json::to_string(&Weekday::Wednesday).expect("serializes");
        assert_eq!(json, "3");
        let bad: Result<Weekday, _> = serde_json::from_str("9");
        assert!(bad.is_err());
    }
}
