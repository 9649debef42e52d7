//! Deduplicated skip-date sets for recurrence patterns.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::recur::core::{CalendarDate, DateValue};

/// Deduplicated set of calendar days excluded from a recurrence.
///
/// Every member canonicalizes before insertion, so the same day added in
/// any representation never grows the set, and membership is independent
/// of insertion order. Unparseable members are dropped: an exception that
/// cannot name a day excludes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DateValue>", into = "Vec<DateValue>")]
pub struct ExceptionSet(BTreeSet<CalendarDate>);

impl ExceptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the day `value` denotes; returns whether the set grew.
    pub fn insert(&mut self, value: &DateValue) -> bool {
        value
            .canonicalize()
            .is_some_and(|date| self.0.insert(date))
    }

    /// Adds an already-canonical day; returns whether the set grew.
    pub fn insert_day(&mut self, date: CalendarDate) -> bool {
        self.0.insert(date)
    }

    #[must_use]
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.0.contains(&date)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical days in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.0.iter().copied()
    }
}

impl<'a> IntoIterator for &'a ExceptionSet {
    type Item = CalendarDate;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, CalendarDate>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl From<Vec<DateValue>> for ExceptionSet {
    fn from(values: Vec<DateValue>) -> Self {
        Self(
            values
                .iter()
                .filter_map(DateValue::canonicalize)
                .collect(),
        )
    }
}

impl From<ExceptionSet> for Vec<DateValue> {
    fn from(set: ExceptionSet) -> Self {
        set.0.into_iter().map(DateValue::from).collect()
    }
}

impl FromIterator<CalendarDate> for ExceptionSet {
    fn from_iter<I: IntoIterator<Item = CalendarDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
