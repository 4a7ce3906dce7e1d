// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Relative-Date Resolver
//!
//! Turns "the last N units" into an absolute epoch-millis [`DateRange`]
//! ending now. Months and years use calendar arithmetic, so "1 month" before
//! March 31 is February 28/29, not a fixed 30 days.

use chrono::{DateTime, Months, TimeDelta, Utc};

use super::predicate::{DateRange, RelativeDate, RelativeUnit};

/// Resolve against the current wall-clock time
pub fn resolve_relative_date(relative: &RelativeDate) -> DateRange {
    resolve_relative_date_at(relative, Utc::now())
}

/// Resolve against an explicit anchor (`to`)
pub fn resolve_relative_date_at(relative: &RelativeDate, now: DateTime<Utc>) -> DateRange {
    let num = relative.num;
    let from = match relative.unit {
        RelativeUnit::Hours => TimeDelta::try_hours(i64::from(num))
            .and_then(|delta| now.checked_sub_signed(delta)),
        RelativeUnit::Days => TimeDelta::try_days(i64::from(num))
            .and_then(|delta| now.checked_sub_signed(delta)),
        RelativeUnit::Weeks => TimeDelta::try_weeks(i64::from(num))
            .and_then(|delta| now.checked_sub_signed(delta)),
        RelativeUnit::Months => now.checked_sub_months(Months::new(num)),
        RelativeUnit::Years => num
            .checked_mul(12)
            .and_then(|months| now.checked_sub_months(Months::new(months))),
    }
    // Saturate instead of failing on absurd spans
    .unwrap_or(DateTime::<Utc>::MIN_UTC);

    DateRange::millis(from.timestamp_millis(), now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::predicate::Scalar;
    use chrono::TimeZone;

    fn millis(range: &DateRange) -> (i64, i64) {
        let as_i64 = |s: &Option<Scalar>| match s {
            Some(Scalar::Number(n)) => n.as_i64().unwrap(),
            other => panic!("Expected numeric bound, got {:?}", other),
        };
        (as_i64(&range.from), as_i64(&range.to))
    }

    #[test]
    fn test_to_is_now() {
        let before = Utc::now().timestamp_millis();
        let range = resolve_relative_date(&RelativeDate::new(2, RelativeUnit::Months));
        let after = Utc::now().timestamp_millis();
        let (from, to) = millis(&range);
        assert!(to >= before && to <= after);
        assert!(from < to);
    }

    #[test]
    fn test_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let range = resolve_relative_date_at(&RelativeDate::new(3, RelativeUnit::Days), now);
        let expected = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(millis(&range), (expected.timestamp_millis(), now.timestamp_millis()));
    }

    #[test]
    fn test_months_are_calendar_correct() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let range = resolve_relative_date_at(&RelativeDate::new(1, RelativeUnit::Months), now);
        // Clamped to the last day of February in a leap year
        let expected = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        assert_eq!(millis(&range).0, expected.timestamp_millis());
    }

    #[test]
    fn test_years() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let range = resolve_relative_date_at(&RelativeDate::new(2, RelativeUnit::Years), now);
        let expected = Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(millis(&range).0, expected.timestamp_millis());
    }

    #[test]
    fn test_hours_and_weeks() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 6, 0, 0).unwrap();
        let hours = resolve_relative_date_at(&RelativeDate::new(12, RelativeUnit::Hours), now);
        let weeks = resolve_relative_date_at(&RelativeDate::new(2, RelativeUnit::Weeks), now);
        assert_eq!(
            millis(&hours).0,
            Utc.with_ymd_and_hms(2024, 6, 14, 18, 0, 0).unwrap().timestamp_millis()
        );
        assert_eq!(
            millis(&weeks).0,
            Utc.with_ymd_and_hms(2024, 6, 1, 6, 0, 0).unwrap().timestamp_millis()
        );
    }

    #[test]
    fn test_huge_span_saturates() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let range = resolve_relative_date_at(&RelativeDate::new(u32::MAX, RelativeUnit::Years), now);
        let (from, to) = millis(&range);
        assert_eq!(from, DateTime::<Utc>::MIN_UTC.timestamp_millis());
        assert_eq!(to, now.timestamp_millis());
    }

    #[test]
    fn test_zero_is_empty_span() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let range = resolve_relative_date_at(&RelativeDate::new(0, RelativeUnit::Days), now);
        let (from, to) = millis(&range);
        assert_eq!(from, to);
    }
}
