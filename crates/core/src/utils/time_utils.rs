use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// Timezone whose calendar defines "today" for snapshots and leaderboards.
/// Daily closes are published on the US market calendar.
pub const DEFAULT_VALUATION_TZ: Tz = chrono_tz::America::New_York;

/// Converts a UTC instant to a valuation date in the given timezone.
pub fn valuation_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's valuation date in [`DEFAULT_VALUATION_TZ`].
pub fn valuation_date_today() -> NaiveDate {
    valuation_date_from_utc(Utc::now(), DEFAULT_VALUATION_TZ)
}

/// Every calendar day from `start` to `end`, inclusive. Empty when `start > end`.
pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// `date` minus `days` calendar days, saturating at the earliest representable date.
pub fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_sub_days(Days::new(days.max(0) as u64))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_between_is_inclusive_and_spans_weekends() {
        let days = get_days_between(date(2024, 3, 8), date(2024, 3, 11));
        assert_eq!(
            days,
            vec![
                date(2024, 3, 8),
                date(2024, 3, 9),
                date(2024, 3, 10),
                date(2024, 3, 11)
            ]
        );
    }

    #[test]
    fn test_days_between_single_and_reversed() {
        assert_eq!(
            get_days_between(date(2024, 2, 29), date(2024, 2, 29)),
            vec![date(2024, 2, 29)]
        );
        assert!(get_days_between(date(2024, 3, 2), date(2024, 3, 1)).is_empty());
    }

    #[test]
    fn test_valuation_date_uses_new_york_calendar() {
        // 02:00 UTC on the 15th is still the evening of the 14th in New York
        let instant = Utc.with_ymd_and_hms(2024, 3, 15, 2, 0, 0).unwrap();
        assert_eq!(
            valuation_date_from_utc(instant, DEFAULT_VALUATION_TZ),
            date(2024, 3, 14)
        );
    }

    #[test]
    fn test_days_before() {
        assert_eq!(days_before(date(2024, 3, 1), 1), date(2024, 2, 29));
        assert_eq!(days_before(date(2024, 3, 1), 0), date(2024, 3, 1));
        assert_eq!(days_before(date(2024, 3, 1), -5), date(2024, 3, 1));
    }
}
