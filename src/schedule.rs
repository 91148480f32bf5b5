//! Due-status and streak arithmetic.
//!
//! Everything here is a pure function of its inputs. Timestamps are Unix
//! milliseconds; calendar days are taken in the local time zone.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone};

use crate::model::TaskFrequency;

/// Convert stored milliseconds to a local timestamp.
#[must_use]
pub fn local_datetime(ms: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp_millis(ms).map(|utc| utc.with_timezone(&Local))
}

/// Local calendar day of a stored timestamp.
#[must_use]
pub fn local_date(ms: i64) -> Option<NaiveDate> {
    local_datetime(ms).map(|dt| dt.date_naive())
}

/// Milliseconds at local midnight starting `day`.
///
/// When midnight does not exist locally (DST gap) the UTC reading is used.
#[must_use]
pub fn start_of_day_ms(day: NaiveDate) -> i64 {
    let midnight = day.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map_or_else(|| midnight.and_utc().timestamp_millis(), |dt| dt.timestamp_millis())
}

/// Half-open `[start, end)` millisecond range covering `day`.
#[must_use]
pub fn day_range_ms(day: NaiveDate) -> (i64, i64) {
    (start_of_day_ms(day), start_of_day_ms(day + Duration::days(1)))
}

/// Whether a task is due at `now`.
///
/// Never completed means due. Daily tasks are due unless completed on
/// today's date; weekly and monthly tasks once 7 / 30 whole days have
/// passed since the last completion.
#[must_use]
pub fn is_due(last_completed: Option<i64>, frequency: TaskFrequency, now: DateTime<Local>) -> bool {
    let Some(last) = last_completed.and_then(local_datetime) else {
        return true;
    };

    match frequency {
        TaskFrequency::Daily => last.date_naive() != now.date_naive(),
        TaskFrequency::Weekly | TaskFrequency::Monthly => {
            (now - last).num_days() >= frequency.interval_days()
        }
    }
}

/// Whether a task will be due at `at`, counting whole days for every
/// frequency. Used when looking ahead for reminders.
#[must_use]
pub fn is_due_on(last_completed: Option<i64>, frequency: TaskFrequency, at: DateTime<Local>) -> bool {
    match last_completed.and_then(local_datetime) {
        Some(last) => (at - last).num_days() >= frequency.interval_days(),
        None => true,
    }
}

/// Consecutive completion days ending today or yesterday.
///
/// If nothing was completed on `today` the count starts from yesterday, so
/// a streak survives until the day is over. `completed_on` reports whether
/// any completion fell on a given day.
///
/// # Errors
///
/// Propagates the first error from `completed_on`.
pub fn walk_back_streak<E>(
    today: NaiveDate,
    mut completed_on: impl FnMut(NaiveDate) -> Result<bool, E>,
) -> Result<u32, E> {
    let mut day = today;
    if !completed_on(day)? {
        day -= Duration::days(1);
    }

    let mut streak = 0;
    while completed_on(day)? {
        streak += 1;
        day -= Duration::days(1);
    }
    Ok(streak)
}

/// Longest run of consecutive calendar days in `days`.
///
/// Input may be unsorted and contain duplicates.
#[must_use]
pub fn longest_run(days: &[NaiveDate]) -> u32 {
    let mut sorted = days.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    if sorted.is_empty() {
        return 0;
    }

    let mut longest = 1;
    let mut current = 1;
    for pair in sorted.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn ms(dt: DateTime<Local>) -> i64 {
        dt.timestamp_millis()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_never_completed_is_due() {
        let now = at(2024, 6, 15, 12);
        for freq in TaskFrequency::ALL {
            assert!(is_due(None, freq, now));
        }
    }

    #[test]
    fn test_daily_completed_today_not_due_until_tomorrow() {
        let done = ms(at(2024, 6, 15, 8));
        assert!(!is_due(Some(done), TaskFrequency::Daily, at(2024, 6, 15, 23)));
        assert!(is_due(Some(done), TaskFrequency::Daily, at(2024, 6, 16, 9)));
    }

    #[test]
    fn test_daily_completed_late_yesterday_is_due() {
        let done = ms(at(2024, 6, 14, 23));
        assert!(is_due(Some(done), TaskFrequency::Daily, at(2024, 6, 15, 1)));
    }

    #[test]
    fn test_weekly_threshold() {
        let done = ms(at(2024, 6, 1, 12));
        assert!(!is_due(Some(done), TaskFrequency::Weekly, at(2024, 6, 7, 12)));
        assert!(is_due(Some(done), TaskFrequency::Weekly, at(2024, 6, 8, 12)));
    }

    #[test]
    fn test_monthly_threshold() {
        let done = ms(at(2024, 6, 1, 12));
        assert!(!is_due(Some(done), TaskFrequency::Monthly, at(2024, 6, 30, 12)));
        assert!(is_due(Some(done), TaskFrequency::Monthly, at(2024, 7, 1, 12)));
    }

    #[test]
    fn test_is_due_on_counts_whole_days() {
        let done = ms(at(2024, 6, 15, 8));
        assert!(!is_due_on(Some(done), TaskFrequency::Daily, at(2024, 6, 15, 20)));
        assert!(is_due_on(Some(done), TaskFrequency::Daily, at(2024, 6, 16, 9)));
    }

    fn streak(today: NaiveDate, days: &[NaiveDate]) -> u32 {
        walk_back_streak::<()>(today, |d| Ok(days.contains(&d))).unwrap()
    }

    #[test]
    fn test_streak_empty_is_zero() {
        assert_eq!(streak(day(2024, 6, 15), &[]), 0);
    }

    #[test]
    fn test_streak_counts_through_today() {
        let days = [day(2024, 6, 13), day(2024, 6, 14), day(2024, 6, 15)];
        assert_eq!(streak(day(2024, 6, 15), &days), 3);
    }

    #[test]
    fn test_streak_survives_until_end_of_day() {
        let days = [day(2024, 6, 12), day(2024, 6, 13), day(2024, 6, 14)];
        assert_eq!(streak(day(2024, 6, 15), &days), 3);
    }

    #[test]
    fn test_streak_broken_by_gap() {
        let days = [day(2024, 6, 10), day(2024, 6, 13)];
        assert_eq!(streak(day(2024, 6, 15), &days), 0);
        assert_eq!(streak(day(2024, 6, 14), &days), 1);
    }

    #[test]
    fn test_longest_run() {
        assert_eq!(longest_run(&[]), 0);
        assert_eq!(longest_run(&[day(2024, 6, 1)]), 1);
        let days = [
            day(2024, 6, 10),
            day(2024, 6, 1),
            day(2024, 6, 2),
            day(2024, 6, 2),
            day(2024, 6, 3),
            day(2024, 6, 9),
        ];
        assert_eq!(longest_run(&days), 3);
    }

    #[test]
    fn test_longest_run_across_month_boundary() {
        let days = [day(2024, 2, 28), day(2024, 2, 29), day(2024, 3, 1)];
        assert_eq!(longest_run(&days), 3);
    }

    #[test]
    fn test_day_range_contains_noon() {
        let (start, end) = day_range_ms(day(2024, 6, 15));
        let noon = ms(at(2024, 6, 15, 12));
        assert!(start <= noon && noon < end);
        assert_eq!(local_date(noon), Some(day(2024, 6, 15)));
    }
}
