use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::dates::{add_days, parse_iso_date, to_iso_string};
use crate::models::WorkoutLog;

pub const DEFAULT_WORKOUTS_PER_WEEK: f64 = 5.0;
pub const FREQUENCY_WINDOW_DAYS: i64 = 28;
const MIN_LOGS_FOR_ESTIMATE: usize = 2;
const HIGH_CONFIDENCE_LOGS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Default,
    Low,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyEstimate {
    pub workouts_per_week: f64,
    pub avg_days_between_workouts: f64,
    pub confidence: Confidence,
}

impl Default for FrequencyEstimate {
    fn default() -> Self {
        Self {
            workouts_per_week: DEFAULT_WORKOUTS_PER_WEEK,
            avg_days_between_workouts: round1(7.0 / DEFAULT_WORKOUTS_PER_WEEK),
            confidence: Confidence::Default,
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Estimate training pace from the last 28 days of completed, non-deload
/// logs. Deload sessions are intentionally excluded: they run at reduced
/// intensity and do not represent normal cadence.
pub fn estimate_frequency(logs: &[WorkoutLog], today: NaiveDate) -> FrequencyEstimate {
    let cutoff = to_iso_string(add_days(today, -FREQUENCY_WINDOW_DAYS));

    let mut recent: Vec<&WorkoutLog> = logs
        .iter()
        .filter(|l| l.completed && !l.is_deload() && l.date.as_str() >= cutoff.as_str())
        .collect();
    recent.sort_by(|a, b| a.date.cmp(&b.date));

    if recent.len() < MIN_LOGS_FOR_ESTIMATE {
        return FrequencyEstimate::default();
    }

    // A day with two logs counts once toward the weekly pace.
    let unique_dates: HashSet<&str> = recent.iter().map(|l| l.date.as_str()).collect();

    let first_date = parse_iso_date(&recent[0].date).unwrap_or(today);
    let day_span = (today - first_date).num_days().max(1);
    let week_span = day_span as f64 / 7.0;

    let workouts_per_week = round1(unique_dates.len() as f64 / week_span).clamp(1.0, 7.0);
    let avg_days_between = round1(7.0 / workouts_per_week);

    FrequencyEstimate {
        workouts_per_week,
        avg_days_between_workouts: avg_days_between,
        confidence: if recent.len() >= HIGH_CONFIDENCE_LOGS {
            Confidence::High
        } else {
            Confidence::Low
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{completed_log, deload_log};

    fn d(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    #[test]
    fn test_empty_history_yields_default() {
        let est = estimate_frequency(&[], d("2026-02-10"));
        assert_eq!(est.workouts_per_week, 5.0);
        assert_eq!(est.avg_days_between_workouts, 1.4);
        assert_eq!(est.confidence, Confidence::Default);
    }

    #[test]
    fn test_single_log_yields_default() {
        let logs = vec![completed_log(1, "2026-02-08", 1, 1)];
        let est = estimate_frequency(&logs, d("2026-02-10"));
        assert_eq!(est.confidence, Confidence::Default);
        assert_eq!(est.workouts_per_week, 5.0);
    }

    #[test]
    fn test_deload_and_incomplete_logs_are_ignored() {
        let mut incomplete = completed_log(1, "2026-02-08", 1, 1);
        incomplete.completed = false;
        let logs = vec![incomplete, deload_log(2, "2026-02-09", 1, 2)];
        let est = estimate_frequency(&logs, d("2026-02-10"));
        assert_eq!(est.confidence, Confidence::Default);
    }

    #[test]
    fn test_daily_training_estimates_high_pace() {
        // 7 consecutive days ending yesterday: span = 7 days = 1 week.
        let logs: Vec<_> = (0..7)
            .map(|i| completed_log(i as u64 + 1, &to_iso_string(add_days(d("2026-02-03"), i)), 1, (i as u32 % 6) + 1))
            .collect();
        let est = estimate_frequency(&logs, d("2026-02-10"));
        assert_eq!(est.workouts_per_week, 7.0);
        assert_eq!(est.avg_days_between_workouts, 1.0);
        assert_eq!(est.confidence, Confidence::High);
    }

    #[test]
    fn test_confidence_low_under_six_logs() {
        let logs: Vec<_> = (0..3)
            .map(|i| completed_log(i as u64 + 1, &to_iso_string(add_days(d("2026-02-01"), i * 3)), 1, i as u32 + 1))
            .collect();
        let est = estimate_frequency(&logs, d("2026-02-10"));
        assert_eq!(est.confidence, Confidence::Low);
    }

    #[test]
    fn test_same_day_logs_count_once() {
        let logs = vec![
            completed_log(1, "2026-02-02", 1, 1),
            completed_log(2, "2026-02-02", 1, 2),
            completed_log(3, "2026-02-06", 1, 3),
        ];
        // 2 unique dates over an 8-day span.
        let est = estimate_frequency(&logs, d("2026-02-10"));
        assert_eq!(est.workouts_per_week, 1.8);
    }

    #[test]
    fn test_old_logs_fall_outside_window() {
        let logs = vec![
            completed_log(1, "2025-12-01", 1, 1),
            completed_log(2, "2025-12-03", 1, 2),
        ];
        let est = estimate_frequency(&logs, d("2026-02-10"));
        assert_eq!(est.confidence, Confidence::Default);
    }
}
