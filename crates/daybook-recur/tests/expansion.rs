//! End-to-end expansion behavior across the public engine surface.

use daybook_recur::recur::core::{CalendarDate, DateValue, RecurrenceRule, Weekday};
use daybook_recur::recur::expand::{MAX_OCCURRENCES, expand_window, generate_dates};

fn day(text: &str) -> CalendarDate {
    text.parse().expect("valid calendar date")
}

fn days(texts: &[&str]) -> Vec<CalendarDate> {
    texts.iter().map(|text| day(text)).collect()
}

#[test_log::test]
fn weekly_phase_preserved_across_skipped_weeks() {
    let rule = RecurrenceRule::weekly([Weekday::Monday, Weekday::Wednesday]).with_interval(2);
    let dates = generate_dates(
        &rule,
        &DateValue::from("2026-02-02"),
        &DateValue::from("2026-02-02"),
        &DateValue::from("2026-02-20"),
    );
    // The in-between week (Feb 9 and Feb 11) is out of phase and must be
    // skipped entirely.
    assert_eq!(
        dates,
        days(&["2026-02-02", "2026-02-04", "2026-02-16", "2026-02-18"])
    );
}

#[test_log::test]
fn month_end_clamping_never_skips_a_month() {
    let rule = RecurrenceRule::monthly(31);
    let dates = generate_dates(
        &rule,
        &DateValue::from("2026-01-31"),
        &DateValue::from("2026-01-01"),
        &DateValue::from("2026-05-01"),
    );
    assert_eq!(
        dates,
        days(&["2026-01-31", "2026-02-28", "2026-03-31", "2026-04-30"])
    );
}

#[test_log::test]
fn leap_day_yearly_rule_clamps_to_feb_28() {
    let rule = RecurrenceRule::yearly(2, 29);
    let dates = generate_dates(
        &rule,
        &DateValue::from("2024-02-29"),
        &DateValue::from("2024-01-01"),
        &DateValue::from("2026-12-31"),
    );
    assert_eq!(dates, days(&["2024-02-29", "2025-02-28", "2026-02-28"]));
}

#[test_log::test]
fn exception_skip_preserves_occurrence_count() {
    let rule = RecurrenceRule::daily()
        .ending_after(3)
        .with_exception("2026-01-02");
    let dates = generate_dates(
        &rule,
        &DateValue::from("2026-01-01"),
        &DateValue::from("2026-01-01"),
        &DateValue::from("2026-01-31"),
    );
    // Exactly three occurrences, none on the excepted day.
    assert_eq!(dates, days(&["2026-01-01", "2026-01-03", "2026-01-04"]));
}

#[test_log::test]
fn window_resumes_mid_series_far_from_anchor() {
    let rule = RecurrenceRule::daily();
    let dates = generate_dates(
        &rule,
        &DateValue::from("2026-01-01"),
        &DateValue::from("2026-03-01"),
        &DateValue::from("2026-03-05"),
    );
    assert_eq!(
        dates,
        days(&[
            "2026-03-01",
            "2026-03-02",
            "2026-03-03",
            "2026-03-04",
            "2026-03-05"
        ])
    );
}

#[test_log::test]
fn safety_cap_bounds_degenerate_windows() {
    let rule = RecurrenceRule::daily();
    let expansion = expand_window(
        &rule,
        &DateValue::from("2026-01-01"),
        &DateValue::from("2026-01-01"),
        &DateValue::from("2100-12-31"),
    );
    assert!(expansion.truncated);
    assert_eq!(expansion.dates.len(), MAX_OCCURRENCES);

    // Ordered, no duplicates.
    let mut sorted = expansion.dates.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted, expansion.dates);
}

#[test_log::test]
fn regeneration_is_idempotent() {
    let rule = RecurrenceRule::weekly([Weekday::Tuesday, Weekday::Saturday])
        .with_interval(3)
        .with_exception("2026-02-21");
    let anchor = DateValue::from("2026-02-03");
    let start = DateValue::from("2026-02-01");
    let end = DateValue::from("2026-06-30");

    let first = generate_dates(&rule, &anchor, &start, &end);
    let second = generate_dates(&rule, &anchor, &start, &end);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test_log::test]
fn date_representation_does_not_change_output() {
    let rule = RecurrenceRule::daily().with_interval(7);
    let window_start = DateValue::from("2026-01-01");
    let window_end = DateValue::from("2026-03-01");

    let from_day_string = generate_dates(
        &rule,
        &DateValue::from("2026-01-24"),
        &window_start,
        &window_end,
    );
    let from_utc_string = generate_dates(
        &rule,
        &DateValue::from("2026-01-24T00:00:00.000Z"),
        &window_start,
        &window_end,
    );
    let from_offset_string = generate_dates(
        &rule,
        &DateValue::from("2026-01-24T22:00:00-05:00"),
        &window_start,
        &window_end,
    );

    assert_eq!(from_day_string, from_utc_string);
    assert_eq!(from_day_string, from_offset_string);
}

#[test_log::test]
fn document_store_shaped_rule_expands() {
    // The shape the persistence layer hands over after deserializing a
    // stored pattern document.
    let json = r#"{
        "kind": "monthly",
        "interval": 1,
        "month_days": [1, 15],
        "end": {"type": "after_occurrences", "count": 5},
        "exceptions": ["2026-02-01T00:00:00Z"]
    }"#;
    let rule: RecurrenceRule = serde_json::from_str(json).expect("stored rule deserializes");

    let dates = generate_dates(
        &rule,
        &DateValue::from("2026-01-01"),
        &DateValue::from("2026-01-01"),
        &DateValue::from("2026-12-31"),
    );
    // Feb 1 is excepted and does not count against the five occurrences.
    assert_eq!(
        dates,
        days(&[
            "2026-01-01",
            "2026-01-15",
            "2026-02-15",
            "2026-03-01",
            "2026-03-15"
        ])
    );
}
