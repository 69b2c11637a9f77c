//! Calendar helpers for reminder expansion.
//!
//! Pure functions: the expansion engine feeds them a reminder window and a
//! wall-clock "now" and gets back the exact set of future fire times.

use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};
use tracing::warn;

pub fn weekday_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

/// Parses an "HH:MM" (24h) time-of-day string.
pub fn parse_time_of_day(value: &str) -> Option<(u32, u32)> {
    let (hour, minute) = value.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;

    if hour > 23 || minute > 59 {
        return None;
    }

    Some((hour, minute))
}

/// Expands a reminder window into concrete future fire times.
///
/// Every calendar day from `start` to `end` inclusive is considered; the
/// end date counts fully (clamped to 23:59:59.999, so a time-of-day late on
/// the final date is still produced). A day qualifies when `days` is empty
/// or contains its weekday abbreviation. Only timestamps strictly after
/// `now` are returned, so no past-dated row is ever scheduled.
///
/// Malformed time strings are skipped with a warning; the rest of the
/// expansion proceeds.
pub fn future_occurrences(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    times: &[String],
    days: &[String],
    now: DateTime<Utc>,
) -> Vec<DateTime<Utc>> {
    let mut occurrences = Vec::new();

    let last_day = end.date_naive();
    let mut day = start.date_naive();

    while day <= last_day {
        let abbrev = weekday_abbrev(day.weekday());

        if days.is_empty() || days.iter().any(|d| d == abbrev) {
            for time in times {
                let Some((hour, minute)) = parse_time_of_day(time) else {
                    warn!("Skipping malformed reminder time {:?}", time);
                    continue;
                };

                let Some(naive) = day.and_hms_opt(hour, minute, 0) else {
                    continue;
                };

                let timestamp = Utc.from_utc_datetime(&naive);
                if timestamp > now {
                    occurrences.push(timestamp);
                }
            }
        }

        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    occurrences.sort();
    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        let naive = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap();
        Utc.from_utc_datetime(&naive)
    }

    fn times(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn single_day_before_first_dose_schedules_both() {
        // 2025-06-05, created at 08:00: both 09:00 and 21:00 lie ahead.
        let day = ts(2025, 6, 5, 0, 0);
        let got = future_occurrences(
            day,
            day,
            &times(&["09:00", "21:00"]),
            &[],
            ts(2025, 6, 5, 8, 0),
        );

        assert_eq!(got, vec![ts(2025, 6, 5, 9, 0), ts(2025, 6, 5, 21, 0)]);
    }

    #[test]
    fn single_day_after_first_dose_schedules_only_remaining() {
        let day = ts(2025, 6, 5, 0, 0);
        let got = future_occurrences(
            day,
            day,
            &times(&["09:00", "21:00"]),
            &[],
            ts(2025, 6, 5, 10, 0),
        );

        assert_eq!(got, vec![ts(2025, 6, 5, 21, 0)]);
    }

    #[test]
    fn weekday_filter_keeps_matching_days_only() {
        // 2025-06-01 is a Sunday; the week holds one Monday (06-02) and
        // one Wednesday (06-04).
        let got = future_occurrences(
            ts(2025, 6, 1, 0, 0),
            ts(2025, 6, 7, 0, 0),
            &times(&["08:00"]),
            &[String::from("Mon"), String::from("Wed")],
            ts(2025, 5, 31, 0, 0),
        );

        assert_eq!(got, vec![ts(2025, 6, 2, 8, 0), ts(2025, 6, 4, 8, 0)]);
    }

    #[test]
    fn end_date_counts_fully() {
        // A late dose on the end date itself must still be produced.
        let got = future_occurrences(
            ts(2025, 6, 1, 0, 0),
            ts(2025, 6, 2, 0, 0),
            &times(&["23:30"]),
            &[],
            ts(2025, 6, 1, 0, 0),
        );

        assert_eq!(got, vec![ts(2025, 6, 1, 23, 30), ts(2025, 6, 2, 23, 30)]);
    }

    #[test]
    fn exact_now_is_not_future() {
        let day = ts(2025, 6, 5, 0, 0);
        let got = future_occurrences(
            day,
            day,
            &times(&["09:00"]),
            &[],
            ts(2025, 6, 5, 9, 0),
        );

        assert!(got.is_empty());
    }

    #[test]
    fn fully_elapsed_window_produces_nothing() {
        let got = future_occurrences(
            ts(2025, 6, 1, 0, 0),
            ts(2025, 6, 7, 0, 0),
            &times(&["09:00", "21:00"]),
            &[],
            ts(2025, 6, 8, 0, 0),
        );

        assert!(got.is_empty());
    }

    #[test]
    fn malformed_times_are_skipped_not_fatal() {
        let day = ts(2025, 6, 5, 0, 0);
        let got = future_occurrences(
            day,
            day,
            &times(&["9am", "25:00", "09:61", "", "21:00"]),
            &[],
            ts(2025, 6, 5, 0, 0),
        );

        assert_eq!(got, vec![ts(2025, 6, 5, 21, 0)]);
    }

    #[test]
    fn parse_time_of_day_bounds() {
        assert_eq!(parse_time_of_day("00:00"), Some((0, 0)));
        assert_eq!(parse_time_of_day("23:59"), Some((23, 59)));
        assert_eq!(parse_time_of_day("24:00"), None);
        assert_eq!(parse_time_of_day("12:60"), None);
        assert_eq!(parse_time_of_day("noon"), None);
    }
}
