use once_cell::sync::Lazy;

use crate::types::Category;

pub const DAYS_PER_CYCLE: u32 = 6;
pub const DEFAULT_DELOAD_INTERVAL_WEEKS: u32 = 5;

/// One exercise slot in the fixed program.
#[derive(Debug, Clone)]
pub struct Exercise {
    pub order: u32,
    pub name: &'static str,
    pub category: Category,
    pub sets: u32,
    pub reps: &'static str,
    pub notes: &'static str,
    pub per_side: bool,
    pub optional: bool,
}

#[derive(Debug, Clone)]
pub struct WorkoutDay {
    pub day_number: u32,
    pub name: &'static str,
    pub exercises: Vec<Exercise>,
}

fn ex(order: u32, name: &'static str, category: Category) -> Exercise {
    Exercise {
        order,
        name,
        category,
        sets: 2,
        reps: "6-12",
        notes: "",
        per_side: false,
        optional: false,
    }
}

fn ex_side(order: u32, name: &'static str, category: Category) -> Exercise {
    Exercise { per_side: true, ..ex(order, name, category) }
}

/// The Sanctum program: a fixed 6-day cycle. Read-only; there is no
/// program editing surface.
pub static PROGRAM: Lazy<Vec<WorkoutDay>> = Lazy::new(|| {
    use Category::*;

    vec![
        WorkoutDay {
            day_number: 1,
            name: "Pull",
            exercises: vec![
                ex(1, "ISO High Row", Back),
                ex(2, "Pronated Grip Elbows Flared ISO Lat Row", Back),
                ex(3, "Wide Neutral Grip Lat Pulldown", Back),
                ex(4, "Supinated Grip Cable Row", Back),
                ex(5, "Dual Handle Rope Face Pulls", Shoulders),
                ex(6, "Hyperextensions", Back),
                ex(7, "Dual Handle Rope Bicep Curls", Biceps),
                ex(8, "Bayesian Curls", Biceps),
            ],
        },
        WorkoutDay {
            day_number: 2,
            name: "Push",
            exercises: vec![
                ex(1, "Pec Deck", Chest),
                ex(2, "Incline Machine Press (Power Smith)", Chest),
                ex(3, "Decline Bench Press", Chest),
                ex(4, "Vertical Pec Fly", Chest),
                ex(5, "Behind The Neck Press", Shoulders),
                ex(6, "Hip High Cable Raises", Shoulders),
                ex(7, "Lean Forward Dips", Triceps),
                ex(8, "Overhead Tricep Extensions", Triceps),
            ],
        },
        WorkoutDay {
            day_number: 3,
            name: "Legs (A)",
            exercises: vec![
                ex(1, "Calf Raises", Legs),
                ex(2, "Leg Curls", Legs),
                ex(3, "Leg Extensions", Legs),
                ex(4, "Hack Squat", Legs),
                ex_side(5, "Bulgarian Split Squats", Legs),
                ex(6, "DB Romanian Deadlift", Legs),
                ex(7, "Abductors", Legs),
                ex(8, "Adductors", Legs),
                ex(9, "Ab Crunch Machine", Abs),
                ex(10, "Roman Chair Leg Raises", Abs),
            ],
        },
        WorkoutDay {
            day_number: 4,
            name: "Chest/Back",
            exercises: vec![
                ex(1, "Incline Barbell Press", Chest),
                ex(2, "Iso Lateral Wide Chest Press", Chest),
                ex(3, "Pec Deck", Chest),
                ex(4, "High to Low Chest Flies", Chest),
                ex_side(5, "Single Arm Cable Row", Back),
                ex(6, "Supinated Close Grip Lat Pulldown", Back),
                ex(7, "Neutral Grip Elbows Flared Cable Row", Back),
                ex(8, "T Bar Upper Back Row into Kelso Shrug", Back),
            ],
        },
        WorkoutDay {
            day_number: 5,
            name: "Shoulders/Arms",
            exercises: vec![
                ex(1, "Reverse Pec Deck", Shoulders),
                ex(2, "DB Y-Raises", Shoulders),
                ex(3, "Power Smith Shoulder Press", Shoulders),
                Exercise {
                    notes: "7 bottom half + 7 top half + 7 full ROM",
                    ..ex(4, "21s Ez Bar Bicep Curl", Biceps)
                },
                ex(5, "DB Hammer Curl", Biceps),
                ex(6, "Preacher Bicep Curl", Biceps),
                ex(7, "DB Skull Crushers", Triceps),
                ex_side(8, "Single Arm Overhead Extensions", Triceps),
                ex(9, "Tricep Pushdown", Triceps),
            ],
        },
        WorkoutDay {
            day_number: 6,
            name: "Legs (B)",
            exercises: vec![
                ex(1, "Calf Raises", Legs),
                ex(2, "Leg Curls", Legs),
                ex(3, "Leg Extensions", Legs),
                ex(4, "Hip Thrust", Legs),
                ex(5, "Leg Press", Legs),
                ex_side(6, "Step-Ups", Legs),
                ex(7, "Stiff Leg Deadlift", Legs),
                ex(8, "Ab Crunch Machine", Abs),
                ex(9, "Roman Chair Leg Raises", Abs),
            ],
        },
    ]
});

pub fn get_workout_day(day_number: u32) -> Option<&'static WorkoutDay> {
    PROGRAM.iter().find(|d| d.day_number == day_number)
}

pub fn get_exercises_for_day(day_number: u32) -> &'static [Exercise] {
    get_workout_day(day_number).map_or(&[], |d| &d.exercises)
}

pub fn day_name(day_number: u32) -> String {
    get_workout_day(day_number).map_or_else(|| format!("Day {}", day_number), |d| d.name.to_string())
}

/// Short label for calendar cells: "Pull", "C/B" for "Chest/Back", etc.
pub fn day_abbrev(day_number: u32) -> String {
    let Some(day) = get_workout_day(day_number) else {
        return format!("D{}", day_number);
    };

    let parts: Vec<&str> = day.name.split('/').collect();
    if parts.len() > 1 {
        parts
            .iter()
            .filter_map(|p| p.trim().chars().next())
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("/")
    } else if day.name.len() > 4 {
        day.name[..4].to_string()
    } else {
        day.name.to_string()
    }
}

/// Every exercise name in the program, for substitute-name suggestions.
pub fn all_exercise_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = PROGRAM.iter().flat_map(|d| d.exercises.iter().map(|e| e.name)).collect();
    names.sort_unstable();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_has_six_days_in_order() {
        assert_eq!(PROGRAM.len(), DAYS_PER_CYCLE as usize);
        for (i, day) in PROGRAM.iter().enumerate() {
            assert_eq!(day.day_number, i as u32 + 1);
            assert!(!day.exercises.is_empty());
        }
    }

    #[test]
    fn test_exercise_orders_are_sequential() {
        for day in PROGRAM.iter() {
            for (i, exercise) in day.exercises.iter().enumerate() {
                assert_eq!(exercise.order, i as u32 + 1, "day {} `{}`", day.day_number, exercise.name);
            }
        }
    }

    #[test]
    fn test_day_abbrevs() {
        assert_eq!(day_abbrev(1), "Pull");
        assert_eq!(day_abbrev(3), "Legs");
        assert_eq!(day_abbrev(4), "C/B");
        assert_eq!(day_abbrev(5), "S/A");
        assert_eq!(day_abbrev(99), "D99");
    }

    #[test]
    fn test_unknown_day_lookup() {
        assert!(get_workout_day(7).is_none());
        assert!(get_exercises_for_day(0).is_empty());
        assert_eq!(day_name(7), "Day 7");
    }
}
