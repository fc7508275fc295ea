use crate::models::WorkoutLog;

/// Most recent completed log for the same program day, excluding the log
/// being compared. Later dates win; within a date the higher sequence
/// number does.
pub fn find_previous_workout<'a>(
    logs: &'a [WorkoutLog],
    day_number: u32,
    current_id: &str,
) -> Option<&'a WorkoutLog> {
    let mut candidates: Vec<&WorkoutLog> = logs
        .iter()
        .filter(|log| log.day_number == day_number && log.completed && log.id != current_id)
        .collect();

    candidates.sort_by(|a, b| b.date.cmp(&a.date).then(b.seq.cmp(&a.seq)));
    candidates.first().copied()
}

/// A set is a PR when its volume (weight × reps) strictly beats the best
/// completed-set volume of the same exercise in the previous session for
/// this day. Sets missing either field on either side never count.
pub fn is_set_pr(
    previous: Option<&WorkoutLog>,
    exercise_name: &str,
    weight: Option<f64>,
    reps: Option<u32>,
    completed: bool,
) -> bool {
    let Some(previous) = previous else { return false };
    if !completed {
        return false;
    }
    let (Some(weight), Some(reps)) = (weight, reps) else { return false };
    let volume = weight * reps as f64;

    let prev_best = previous
        .exercises
        .iter()
        .filter(|ex| ex.exercise_name == exercise_name && !ex.is_skipped())
        .flat_map(|ex| ex.sets.iter())
        .filter(|set| set.completed)
        .filter_map(|set| Some(set.weight? * set.reps? as f64))
        .fold(0.0_f64, f64::max);

    prev_best > 0.0 && volume > prev_best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{completed_log, exercise_log, set_log};

    fn benchmark_log(seq: u64, date: &str, weight: f64) -> WorkoutLog {
        let mut log = completed_log(seq, date, 1, 2);
        log.exercises = vec![exercise_log(
            "Incline Smith Press",
            vec![set_log(1, Some(weight), Some(8), true)],
        )];
        log
    }

    #[test]
    fn test_previous_workout_picks_latest_date() {
        let logs = vec![
            benchmark_log(1, "2026-01-10", 100.0),
            benchmark_log(2, "2026-01-20", 110.0),
            benchmark_log(3, "2026-01-15", 105.0),
        ];
        let prev = find_previous_workout(&logs, 2, "current").unwrap();
        assert_eq!(prev.date, "2026-01-20");
    }

    #[test]
    fn test_previous_workout_same_date_ties_on_seq() {
        let logs = vec![
            benchmark_log(4, "2026-01-20", 100.0),
            benchmark_log(9, "2026-01-20", 120.0),
        ];
        let prev = find_previous_workout(&logs, 2, "current").unwrap();
        assert_eq!(prev.seq, 9);
    }

    #[test]
    fn test_previous_workout_excludes_current_and_other_days() {
        let mut own = benchmark_log(1, "2026-01-20", 100.0);
        own.id = "current".to_string();
        let other_day = completed_log(2, "2026-01-21", 1, 3);
        let mut incomplete = benchmark_log(3, "2026-01-19", 100.0);
        incomplete.completed = false;

        let logs = vec![own, other_day, incomplete];
        assert!(find_previous_workout(&logs, 2, "current").is_none());
    }

    #[test]
    fn test_pr_requires_strict_improvement() {
        // Previous best volume: 110 × 8 = 880.
        let prev = benchmark_log(1, "2026-01-20", 110.0);
        assert!(is_set_pr(Some(&prev), "Incline Smith Press", Some(115.0), Some(8), true));
        assert!(!is_set_pr(Some(&prev), "Incline Smith Press", Some(110.0), Some(8), true));
        assert!(!is_set_pr(Some(&prev), "Incline Smith Press", Some(105.0), Some(8), true));
    }

    #[test]
    fn test_pr_compares_volume_not_weight() {
        // Previous best volume: 100 × 8 = 800.
        let prev = benchmark_log(1, "2026-01-20", 100.0);
        // Same weight for more reps beats the old volume.
        assert!(is_set_pr(Some(&prev), "Incline Smith Press", Some(100.0), Some(12), true));
        // A heavy single falls well short of it.
        assert!(!is_set_pr(Some(&prev), "Incline Smith Press", Some(105.0), Some(1), true));
        assert!(is_set_pr(Some(&prev), "Incline Smith Press", Some(90.0), Some(9), true));
    }

    #[test]
    fn test_pr_needs_previous_session_and_completed_set() {
        assert!(!is_set_pr(None, "Incline Smith Press", Some(500.0), Some(8), true));
        let prev = benchmark_log(1, "2026-01-20", 110.0);
        assert!(!is_set_pr(Some(&prev), "Incline Smith Press", Some(115.0), Some(8), false));
        assert!(!is_set_pr(Some(&prev), "Incline Smith Press", None, Some(8), true));
        assert!(!is_set_pr(Some(&prev), "Incline Smith Press", Some(115.0), None, true));
    }

    #[test]
    fn test_pr_skips_previous_sets_missing_reps() {
        let mut prev = completed_log(1, "2026-01-20", 1, 2);
        prev.exercises = vec![exercise_log(
            "Incline Smith Press",
            vec![set_log(1, Some(200.0), None, true)],
        )];
        // The only previous set has no reps, so there is no benchmark volume.
        assert!(!is_set_pr(Some(&prev), "Incline Smith Press", Some(100.0), Some(10), true));
    }

    #[test]
    fn test_pr_ignores_skipped_and_unlogged_previous_sets() {
        let mut prev = completed_log(1, "2026-01-20", 1, 2);
        prev.exercises = vec![
            {
                let mut ex = exercise_log(
                    "Incline Smith Press",
                    vec![set_log(1, Some(200.0), Some(8), true)],
                );
                ex.skipped = Some(true);
                ex
            },
            exercise_log(
                "Incline Smith Press",
                vec![set_log(1, Some(100.0), Some(8), false), set_log(2, None, None, true)],
            ),
        ];
        // No counted previous volume, so nothing qualifies as a PR.
        assert!(!is_set_pr(Some(&prev), "Incline Smith Press", Some(50.0), Some(10), true));
    }

    #[test]
    fn test_pr_scoped_to_exercise_name() {
        let prev = benchmark_log(1, "2026-01-20", 110.0);
        assert!(!is_set_pr(Some(&prev), "Pec Deck", Some(115.0), Some(8), true));
    }
}
