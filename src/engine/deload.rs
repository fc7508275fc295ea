use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{add_days, monday_of, parse_iso_date, to_iso_string, weekday_index};
use crate::models::UserProgress;

pub const DEFAULT_DELOAD_DISPLAY_COUNT: usize = 2;

/// A scheduled deload week, normalized to Monday..Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeloadWeek {
    /// Monday, ISO.
    pub start_date: String,
    /// Sunday, ISO.
    pub end_date: String,
}

fn anchor_date(progress: &UserProgress, today: NaiveDate) -> NaiveDate {
    let anchor = progress.last_deload_date.as_deref().unwrap_or(&progress.cycle_start_date);
    parse_iso_date(anchor).unwrap_or(today)
}

/// Project the next `count` deload weeks. Does not mutate progress;
/// recording an actual deload is the storage layer's job.
///
/// The first candidate is `anchor + interval` weeks. When that has already
/// slipped into the past the deload is overdue, and gets rescheduled into
/// the current week if today is Mon-Wed, otherwise the following Monday.
/// Later candidates are spaced `interval + 1` weeks from the prior Monday:
/// the deload week itself does not count toward the next interval.
pub fn calculate_deload_weeks(progress: &UserProgress, count: usize, today: NaiveDate) -> Vec<DeloadWeek> {
    let interval_weeks = progress.deload_interval_weeks as i64;
    let anchor = anchor_date(progress, today);

    let mut weeks = Vec::with_capacity(count);
    let mut target = add_days(anchor, interval_weeks * 7);

    for i in 0..count {
        if i == 0 && target < today {
            let monday = monday_of(today);
            target = if weekday_index(today) <= 2 { monday } else { add_days(monday, 7) };
        }

        let deload_monday = monday_of(target);
        weeks.push(DeloadWeek {
            start_date: to_iso_string(deload_monday),
            end_date: to_iso_string(add_days(deload_monday, 6)),
        });

        target = add_days(deload_monday, (interval_weeks + 1) * 7);
    }

    weeks
}

/// Whether enough weeks have passed since the last deload (or cycle start)
/// that a deload should be suggested.
pub fn deload_due(progress: &UserProgress, today: NaiveDate) -> bool {
    let anchor = anchor_date(progress, today);
    let weeks_since = (today - anchor).num_days() as f64 / 7.0;
    weeks_since >= progress.deload_interval_weeks as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    fn progress(cycle_start: &str, interval: u32, last_deload: Option<&str>) -> UserProgress {
        let mut p = UserProgress::new(cycle_start.to_string(), interval);
        p.last_deload_date = last_deload.map(str::to_string);
        p
    }

    #[test]
    fn test_future_target_normalizes_to_its_week() {
        // Anchor Thu 2026-01-01 + 5 weeks = Thu 2026-02-05, whose Monday
        // is 2026-02-02.
        let p = progress("2026-01-01", 5, None);
        let weeks = calculate_deload_weeks(&p, 2, d("2026-01-10"));
        assert_eq!(weeks[0].start_date, "2026-02-02");
        assert_eq!(weeks[0].end_date, "2026-02-08");
    }

    #[test]
    fn test_overdue_early_in_week_reschedules_to_this_monday() {
        // Target 2026-02-05 is past; today Tue 2026-02-10 (index 1).
        let p = progress("2026-01-01", 5, None);
        let weeks = calculate_deload_weeks(&p, 2, d("2026-02-10"));
        assert_eq!(weeks[0].start_date, "2026-02-09");
        assert_eq!(weeks[0].end_date, "2026-02-15");
    }

    #[test]
    fn test_overdue_late_in_week_reschedules_to_next_monday() {
        // Today Thu 2026-02-12 (index 3) → next Monday.
        let p = progress("2026-01-01", 5, None);
        let weeks = calculate_deload_weeks(&p, 2, d("2026-02-12"));
        assert_eq!(weeks[0].start_date, "2026-02-16");
    }

    #[test]
    fn test_last_deload_date_wins_over_cycle_start() {
        let p = progress("2025-11-01", 5, Some("2026-01-19"));
        let weeks = calculate_deload_weeks(&p, 1, d("2026-01-20"));
        // 2026-01-19 (Mon) + 5 weeks = Mon 2026-02-23.
        assert_eq!(weeks[0].start_date, "2026-02-23");
    }

    #[test]
    fn test_subsequent_weeks_spaced_interval_plus_one() {
        let p = progress("2026-01-01", 5, None);
        let weeks = calculate_deload_weeks(&p, 3, d("2026-01-10"));
        assert_eq!(weeks[0].start_date, "2026-02-02");
        // +6 weeks, not +5: the deload week itself is excluded.
        assert_eq!(weeks[1].start_date, "2026-03-16");
        assert_eq!(weeks[2].start_date, "2026-04-27");
    }

    #[test]
    fn test_deload_due_threshold() {
        let p = progress("2026-01-01", 5, None);
        assert!(!deload_due(&p, d("2026-02-04")));
        assert!(deload_due(&p, d("2026-02-05")));
        assert!(deload_due(&p, d("2026-03-01")));
    }
}
