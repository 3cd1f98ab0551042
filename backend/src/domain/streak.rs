//! Consecutive-day streak calculation and calendar-day helpers.
//!
//! Calendar days are taken in the time zone of the evaluation time. The
//! repository evaluates against the process's local zone, so an event logged
//! late in the evening in one zone can fall on a different day when checked
//! from another.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::BTreeSet;

/// Number of consecutive calendar days, ending today or yesterday, with at
/// least one timestamp
///
/// Several timestamps on the same day count once. A streak whose most
/// recent day is older than yesterday is broken and yields 0; yesterday
/// still counts because today is not over yet.
pub fn compute_streak<Tz: TimeZone>(timestamps: &[DateTime<Utc>], now: &DateTime<Tz>) -> u32 {
    if timestamps.is_empty() {
        return 0;
    }

    let zone = now.timezone();
    let days: BTreeSet<NaiveDate> = timestamps
        .iter()
        .map(|ts| ts.with_timezone(&zone).date_naive())
        .collect();

    let today = now.date_naive();
    let yesterday = today - Duration::days(1);

    let mut descending = days.iter().rev().peekable();
    let most_recent = match descending.peek() {
        Some(day) => **day,
        None => return 0,
    };
    if most_recent != today && most_recent != yesterday {
        return 0;
    }

    let mut streak = 0;
    let mut expected = most_recent;
    for day in descending {
        if *day != expected {
            break;
        }
        streak += 1;
        expected = match expected.pred_opt() {
            Some(previous) => previous,
            None => break,
        };
    }

    streak
}

/// [`compute_streak`] evaluated against the current local time
pub fn compute_streak_local(timestamps: &[DateTime<Utc>]) -> u32 {
    compute_streak(timestamps, &Local::now())
}

/// Midnight at the start of `now`'s calendar day, as a UTC instant
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|start| start.with_timezone(&Utc))
        // Midnight skipped by a DST jump; the day started later, at the latest now
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

/// Whether `timestamp` falls on the same calendar day as `now`, in `now`'s zone
pub fn same_calendar_day<Tz: TimeZone>(timestamp: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    timestamp.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn stockholm_noon() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 10, 12, 0, 0)
            .unwrap()
    }

    fn days_ago(now: &DateTime<FixedOffset>, days: i64) -> DateTime<Utc> {
        (now.clone() - Duration::days(days)).with_timezone(&Utc)
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(compute_streak(&[], &stockholm_noon()), 0);
    }

    #[test]
    fn test_single_day_today_or_yesterday() {
        let now = stockholm_noon();
        assert_eq!(compute_streak(&[days_ago(&now, 0)], &now), 1);
        assert_eq!(compute_streak(&[days_ago(&now, 1)], &now), 1);
    }

    #[test]
    fn test_older_than_yesterday_is_broken() {
        let now = stockholm_noon();
        assert_eq!(compute_streak(&[days_ago(&now, 2)], &now), 0);
        let old_run = [days_ago(&now, 2), days_ago(&now, 3), days_ago(&now, 4)];
        assert_eq!(compute_streak(&old_run, &now), 0);
    }

    #[test]
    fn test_consecutive_days() {
        let now = stockholm_noon();
        let ts = [days_ago(&now, 0), days_ago(&now, 1), days_ago(&now, 2)];
        assert_eq!(compute_streak(&ts, &now), 3);
    }

    #[test]
    fn test_gap_stops_the_count() {
        let now = stockholm_noon();
        let ts = [days_ago(&now, 0), days_ago(&now, 2)];
        assert_eq!(compute_streak(&ts, &now), 1);

        let ts = [days_ago(&now, 1), days_ago(&now, 2), days_ago(&now, 4), days_ago(&now, 5)];
        assert_eq!(compute_streak(&ts, &now), 2);
    }

    #[test]
    fn test_same_day_duplicates_count_once() {
        let now = stockholm_noon();
        let earlier_today = (now.clone() - Duration::hours(3)).with_timezone(&Utc);
        let ts = [days_ago(&now, 0), earlier_today, days_ago(&now, 1)];
        assert_eq!(compute_streak(&ts, &now), 2);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let now = stockholm_noon();
        let ts = [days_ago(&now, 2), days_ago(&now, 0), days_ago(&now, 1)];
        assert_eq!(compute_streak(&ts, &now), 3);
    }

    #[test]
    fn test_days_follow_the_evaluation_zone() {
        // 23:30 UTC on March 9th is already March 10th in UTC+1
        let now = stockholm_noon();
        let late = Utc.with_ymd_and_hms(2026, 3, 9, 23, 30, 0).unwrap();
        assert!(same_calendar_day(&late, &now));
        assert_eq!(compute_streak(&[late], &now), 1);

        let utc_now = now.with_timezone(&Utc);
        assert!(!same_calendar_day(&late, &utc_now));
    }

    #[test]
    fn test_future_days_do_not_count() {
        let now = stockholm_noon();
        let tomorrow = (now.clone() + Duration::days(1)).with_timezone(&Utc);
        assert_eq!(compute_streak(&[tomorrow], &now), 0);
    }

    #[test]
    fn test_start_of_day() {
        let now = stockholm_noon();
        let start = start_of_day(&now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 9, 23, 0, 0).unwrap());
        assert!(start <= now.with_timezone(&Utc));
    }

    #[test]
    fn test_local_wrapper_counts_now() {
        assert_eq!(compute_streak_local(&[Utc::now()]), 1);
        assert_eq!(compute_streak_local(&[]), 0);
    }
}
