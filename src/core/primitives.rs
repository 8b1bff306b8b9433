use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const SECONDS_PER_DAY: f64 = 86_400.0;

#[must_use]
pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable second of the calendar day.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59).unwrap_or_else(|| midnight(date))
}

#[must_use]
pub fn top_of_hour(time: NaiveDateTime) -> NaiveDateTime {
    time.with_nanosecond(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_minute(0))
        .unwrap_or(time)
}

#[must_use]
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Sunday at or before `date`.
#[must_use]
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

#[must_use]
pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

#[must_use]
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

#[must_use]
pub fn add_months(time: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    time.checked_add_months(Months::new(months))
}

/// Real day count (28-31) of the month `date` falls in.
#[must_use]
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        None => 31,
    }
}

/// Calendar months from `from`'s month to `to`'s month, ignoring the day.
#[must_use]
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}

/// Zero-based position of `date` inside its month as a fraction of the month length.
#[must_use]
pub fn month_day_fraction(date: NaiveDate) -> f64 {
    f64::from(date.day0()) / f64::from(days_in_month(date))
}

#[must_use]
pub fn elapsed_days(target: NaiveDate, origin: NaiveDate) -> f64 {
    (target - origin).num_days() as f64
}

#[must_use]
pub fn elapsed_days_between(target: NaiveDateTime, origin: NaiveDateTime) -> f64 {
    (target - origin).num_seconds() as f64 / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
    }

    #[test]
    fn days_in_month_handles_february_and_leap_years() {
        assert_eq!(days_in_month(d(2024, 2, 10)), 29);
        assert_eq!(days_in_month(d(2025, 2, 10)), 28);
        assert_eq!(days_in_month(d(2025, 4, 30)), 30);
        assert_eq!(days_in_month(d(2025, 12, 1)), 31);
    }

    #[test]
    fn start_of_week_is_sunday_at_or_before() {
        // 2025-01-01 is a Wednesday.
        assert_eq!(start_of_week(d(2025, 1, 1)), d(2024, 12, 29));
        assert_eq!(start_of_week(d(2024, 12, 29)), d(2024, 12, 29));
    }

    #[test]
    fn months_between_crosses_year_boundaries() {
        assert_eq!(months_between(d(2024, 11, 15), d(2025, 2, 1)), 3);
        assert_eq!(months_between(d(2025, 2, 1), d(2024, 11, 15)), -3);
    }

    #[test]
    fn month_day_fraction_is_zero_on_the_first() {
        assert_eq!(month_day_fraction(d(2025, 3, 1)), 0.0);
        assert!((month_day_fraction(d(2025, 2, 15)) - 14.0 / 28.0).abs() <= 1e-12);
    }
}
