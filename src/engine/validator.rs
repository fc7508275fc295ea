use itertools::Itertools;

use crate::models::ExerciseLog;
use crate::program::Exercise;

/// What a set still needs before it counts as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Weight,
    Reps,
    Completed,
}

impl MissingField {
    fn label(self) -> &'static str {
        match self {
            MissingField::Weight => "weight",
            MissingField::Reps => "reps",
            MissingField::Completed => "completion",
        }
    }
}

/// One set the lifter has not finished logging.
#[derive(Debug, Clone, PartialEq)]
pub struct IncompleteSet {
    pub exercise_name: String,
    pub set_number: u32,
    pub missing_fields: Vec<MissingField>,
    pub is_optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub incomplete: Vec<IncompleteSet>,
}

impl ValidationResult {
    /// One line per incomplete required set. Optional exercises are left
    /// out; they never block finishing.
    pub fn messages(&self) -> Vec<String> {
        self.incomplete
            .iter()
            .filter(|set| !set.is_optional)
            .map(|set| {
                format!(
                    "{}: set {} missing {}",
                    set.exercise_name,
                    set.set_number,
                    set.missing_fields.iter().map(|f| f.label()).join(", ")
                )
            })
            .collect()
    }
}

/// A set counts as done when it is marked completed with both weight and
/// reps recorded. Skipped exercises are exempt entirely; incomplete sets on
/// optional exercises are reported but never affect validity. Program
/// definitions are matched to logs by position, the same order the session
/// was built in.
pub fn validate_workout_completion(
    exercises: &[ExerciseLog],
    definitions: &[Exercise],
) -> ValidationResult {
    let mut incomplete = Vec::new();

    for (i, exercise) in exercises.iter().enumerate() {
        if exercise.is_skipped() {
            continue;
        }
        let is_optional = definitions.get(i).is_some_and(|d| d.optional);
        for set in &exercise.sets {
            let mut missing_fields = Vec::new();
            if set.weight.is_none() {
                missing_fields.push(MissingField::Weight);
            }
            if set.reps.is_none() {
                missing_fields.push(MissingField::Reps);
            }
            if !set.completed {
                missing_fields.push(MissingField::Completed);
            }
            if !missing_fields.is_empty() {
                incomplete.push(IncompleteSet {
                    exercise_name: exercise.exercise_name.clone(),
                    set_number: set.set_number,
                    missing_fields,
                    is_optional,
                });
            }
        }
    }

    let is_valid = incomplete.iter().all(|set| set.is_optional);
    ValidationResult { is_valid, incomplete }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{exercise_log, set_log};
    use crate::types::Category;

    fn definition(name: &'static str, optional: bool) -> Exercise {
        Exercise {
            order: 1,
            name,
            category: Category::Chest,
            sets: 1,
            reps: "6-12",
            notes: "",
            per_side: false,
            optional,
        }
    }

    #[test]
    fn test_fully_logged_workout_is_valid() {
        let exercises = vec![
            exercise_log("A", vec![set_log(1, Some(100.0), Some(10), true)]),
            exercise_log("B", vec![set_log(1, Some(50.0), Some(12), true), set_log(2, Some(50.0), Some(11), true)]),
        ];
        let definitions = vec![definition("A", false), definition("B", false)];
        let result = validate_workout_completion(&exercises, &definitions);
        assert!(result.is_valid);
        assert!(result.incomplete.is_empty());
    }

    #[test]
    fn test_missing_fields_reported_per_set() {
        let exercises = vec![exercise_log(
            "Lat Pulldown",
            vec![
                set_log(1, Some(120.0), Some(10), true),
                set_log(2, Some(120.0), Some(8), false),
                set_log(3, None, Some(8), true),
                set_log(4, Some(120.0), None, true),
            ],
        )];
        let result = validate_workout_completion(&exercises, &[definition("Lat Pulldown", false)]);
        assert!(!result.is_valid);
        assert_eq!(result.incomplete.len(), 3);
        assert_eq!(result.incomplete[0].missing_fields, vec![MissingField::Completed]);
        assert_eq!(result.incomplete[1].missing_fields, vec![MissingField::Weight]);
        assert_eq!(result.incomplete[2].missing_fields, vec![MissingField::Reps]);
        assert_eq!(
            result.messages(),
            vec![
                "Lat Pulldown: set 2 missing completion",
                "Lat Pulldown: set 3 missing weight",
                "Lat Pulldown: set 4 missing reps",
            ]
        );
    }

    #[test]
    fn test_empty_set_lists_every_missing_field() {
        let exercises = vec![exercise_log("Pec Deck", vec![set_log(2, None, None, false)])];
        let result = validate_workout_completion(&exercises, &[definition("Pec Deck", false)]);
        assert_eq!(
            result.incomplete[0].missing_fields,
            vec![MissingField::Weight, MissingField::Reps, MissingField::Completed]
        );
        assert_eq!(result.messages(), vec!["Pec Deck: set 2 missing weight, reps, completion"]);
    }

    #[test]
    fn test_optional_exercise_never_blocks_validity() {
        let exercises = vec![
            exercise_log("Pec Deck", vec![set_log(1, Some(120.0), Some(10), true)]),
            exercise_log("Cable Flys", vec![set_log(1, None, None, false)]),
        ];
        let definitions = vec![definition("Pec Deck", false), definition("Cable Flys", true)];
        let result = validate_workout_completion(&exercises, &definitions);

        assert!(result.is_valid);
        assert_eq!(result.incomplete.len(), 1);
        assert!(result.incomplete[0].is_optional);
        assert!(result.messages().is_empty());
    }

    #[test]
    fn test_required_gaps_still_fail_alongside_optional_ones() {
        let exercises = vec![
            exercise_log("Pec Deck", vec![set_log(1, None, None, false)]),
            exercise_log("Cable Flys", vec![set_log(1, None, None, false)]),
        ];
        let definitions = vec![definition("Pec Deck", false), definition("Cable Flys", true)];
        let result = validate_workout_completion(&exercises, &definitions);

        assert!(!result.is_valid);
        assert_eq!(result.messages(), vec!["Pec Deck: set 1 missing weight, reps, completion"]);
    }

    #[test]
    fn test_skipped_exercises_are_exempt() {
        let mut skipped = exercise_log("Pec Deck", vec![set_log(1, None, None, false)]);
        skipped.skipped = Some(true);
        let result = validate_workout_completion(&[skipped], &[definition("Pec Deck", false)]);
        assert!(result.is_valid);
    }
}
