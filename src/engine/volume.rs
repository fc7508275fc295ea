use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{ExerciseLog, SetLog, WorkoutLog};
use crate::types::WeightUnit;

const LB_TO_KG: f64 = 0.453592;

/// Aggregate volume over one cycle's completed workouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeData {
    pub total_volume: f64,
    pub sets: usize,
    pub exercises: usize,
}

/// weight × reps, counted only once the set is completed with both fields
/// filled in.
pub fn calculate_set_volume(set: &SetLog) -> f64 {
    match (set.completed, set.weight, set.reps) {
        (true, Some(weight), Some(reps)) => weight * reps as f64,
        _ => 0.0,
    }
}

pub fn calculate_exercise_volume(exercise: &ExerciseLog) -> f64 {
    if exercise.is_skipped() {
        return 0.0;
    }
    exercise.sets.iter().map(calculate_set_volume).sum()
}

pub fn calculate_total_volume(exercises: &[ExerciseLog]) -> f64 {
    exercises.iter().map(calculate_exercise_volume).sum()
}

pub fn calculate_workout_volume(workout: &WorkoutLog) -> f64 {
    calculate_total_volume(&workout.exercises)
}

/// Volume, completed-set count, and distinct non-skipped exercise count
/// across all completed logs of `cycle`.
pub fn get_current_cycle_volume(workouts: &[WorkoutLog], cycle: u32) -> VolumeData {
    let cycle_workouts: Vec<&WorkoutLog> =
        workouts.iter().filter(|w| w.cycle == cycle && w.completed).collect();

    let total_volume = cycle_workouts.iter().map(|w| calculate_workout_volume(w)).sum();

    let sets = cycle_workouts
        .iter()
        .flat_map(|w| w.exercises.iter())
        .map(|ex| ex.sets.iter().filter(|s| s.completed).count())
        .sum();

    let mut unique: HashSet<&str> = HashSet::new();
    for workout in &cycle_workouts {
        for ex in &workout.exercises {
            if !ex.is_skipped() {
                unique.insert(ex.exercise_name.as_str());
            }
        }
    }

    VolumeData { total_volume, sets, exercises: unique.len() }
}

/// Convert a stored pound figure for display. Kilogram values are rounded
/// to one decimal.
pub fn convert_weight(lbs: f64, unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Lb => lbs,
        WeightUnit::Kg => (lbs * LB_TO_KG * 10.0).round() / 10.0,
    }
}

/// Inverse of `convert_weight`, for user input given in the display unit.
pub fn input_to_lbs(value: f64, unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Lb => value,
        WeightUnit::Kg => (value / LB_TO_KG * 10.0).round() / 10.0,
    }
}

pub fn format_weight(lbs: f64, unit: WeightUnit) -> String {
    format!("{} {}", trim_number(convert_weight(lbs, unit)), unit)
}

/// "12.5k lb" at 10k and above, "9,500 lb" below.
pub fn format_volume(volume_lbs: f64, unit: WeightUnit) -> String {
    let converted = convert_weight(volume_lbs, unit);
    if converted >= 10_000.0 {
        format!("{:.1}k {}", converted / 1000.0, unit)
    } else {
        format!("{} {}", group_thousands(&trim_number(converted)), unit)
    }
}

/// Render without a trailing ".0" but keep genuine decimals.
fn trim_number(v: f64) -> String {
    if (v - v.trunc()).abs() < f64::EPSILON {
        format!("{}", v.trunc() as i64)
    } else {
        format!("{:.1}", v)
    }
}

fn group_thousands(s: &str) -> String {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{completed_log, exercise_log, set_log};

    #[test]
    fn test_set_volume_requires_completion_and_data() {
        assert_eq!(calculate_set_volume(&set_log(1, Some(100.0), Some(10), true)), 1000.0);
        assert_eq!(calculate_set_volume(&set_log(1, Some(100.0), Some(10), false)), 0.0);
        assert_eq!(calculate_set_volume(&set_log(1, None, Some(10), true)), 0.0);
        assert_eq!(calculate_set_volume(&set_log(1, Some(100.0), None, true)), 0.0);
    }

    #[test]
    fn test_skipped_exercise_contributes_nothing() {
        let mut ex = exercise_log("Pec Deck", vec![set_log(1, Some(100.0), Some(10), true)]);
        assert_eq!(calculate_exercise_volume(&ex), 1000.0);
        ex.skipped = Some(true);
        assert_eq!(calculate_exercise_volume(&ex), 0.0);
    }

    #[test]
    fn test_total_volume_is_additive() {
        let exercises = vec![
            exercise_log("A", vec![set_log(1, Some(100.0), Some(10), true), set_log(2, Some(110.0), Some(8), true)]),
            exercise_log("B", vec![set_log(1, Some(50.0), Some(12), true)]),
        ];
        assert_eq!(calculate_total_volume(&exercises), 1000.0 + 880.0 + 600.0);
    }

    #[test]
    fn test_cycle_volume_counts_distinct_exercises() {
        let mut log1 = completed_log(1, "2026-02-01", 1, 1);
        log1.exercises = vec![
            exercise_log("A", vec![set_log(1, Some(100.0), Some(10), true)]),
            exercise_log("B", vec![set_log(1, Some(50.0), Some(10), true), set_log(2, None, None, false)]),
        ];
        let mut log2 = completed_log(2, "2026-02-03", 1, 2);
        log2.exercises = vec![exercise_log("A", vec![set_log(1, Some(105.0), Some(10), true)])];
        // Different cycle, excluded entirely.
        let mut log3 = completed_log(3, "2026-02-05", 2, 1);
        log3.exercises = vec![exercise_log("C", vec![set_log(1, Some(500.0), Some(10), true)])];

        let data = get_current_cycle_volume(&[log1, log2, log3], 1);
        assert_eq!(data.total_volume, 1000.0 + 500.0 + 1050.0);
        assert_eq!(data.sets, 3);
        assert_eq!(data.exercises, 2);
    }

    #[test]
    fn test_incomplete_logs_excluded_from_cycle_volume() {
        let mut log = completed_log(1, "2026-02-01", 1, 1);
        log.completed = false;
        log.exercises = vec![exercise_log("A", vec![set_log(1, Some(100.0), Some(10), true)])];
        let data = get_current_cycle_volume(&[log], 1);
        assert_eq!(data.total_volume, 0.0);
        assert_eq!(data.sets, 0);
    }

    #[test]
    fn test_volume_formatting() {
        assert_eq!(format_volume(12_450.0, WeightUnit::Lb), "12.4k lb");
        assert_eq!(format_volume(9_500.0, WeightUnit::Lb), "9,500 lb");
        assert_eq!(format_volume(850.0, WeightUnit::Lb), "850 lb");
    }

    #[test]
    fn test_volume_formatting_converts_before_threshold_check() {
        // 22,000 lb ≈ 9,979 kg: above 10k in pounds, below in kilograms.
        assert_eq!(format_volume(22_000.0, WeightUnit::Lb), "22.0k lb");
        assert_eq!(format_volume(22_000.0, WeightUnit::Kg), "9,979 kg");
    }

    #[test]
    fn test_weight_conversion_rounds_to_one_decimal() {
        assert_eq!(convert_weight(225.0, WeightUnit::Kg), 102.1);
        assert_eq!(convert_weight(225.0, WeightUnit::Lb), 225.0);
        assert_eq!(format_weight(102.5, WeightUnit::Lb), "102.5 lb");
    }
}
