//! Pure projection and analysis logic. Nothing in here touches storage or
//! the terminal; every function takes state in and returns values out, with
//! `today` passed explicitly so behavior is reproducible.

pub mod deload;
pub mod frequency;
pub mod pr;
pub mod projection;
pub mod validator;
pub mod volume;

pub use deload::deload_due;
pub use frequency::estimate_frequency;
pub use pr::{find_previous_workout, is_set_pr};
pub use projection::{next_workout_day, CalendarProjection};
pub use volume::{calculate_workout_volume, get_current_cycle_volume, VolumeData};

#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::models::{ExerciseLog, SetLog, UserProgress, WorkoutLog};
    use crate::program;

    pub fn progress_starting(cycle_start: &str) -> UserProgress {
        UserProgress::new(cycle_start.to_string(), program::DEFAULT_DELOAD_INTERVAL_WEEKS)
    }

    pub fn completed_log(seq: u64, date: &str, cycle: u32, day_number: u32) -> WorkoutLog {
        WorkoutLog {
            id: format!("log-{seq}"),
            seq,
            date: date.to_string(),
            cycle,
            day_number,
            day_name: program::day_name(day_number),
            exercises: Vec::new(),
            completed: true,
            total_volume: None,
            duration: None,
            session_notes: None,
            is_deload: None,
        }
    }

    pub fn deload_log(seq: u64, date: &str, cycle: u32, day_number: u32) -> WorkoutLog {
        let mut log = completed_log(seq, date, cycle, day_number);
        log.is_deload = Some(true);
        log
    }

    pub fn exercise_log(name: &str, sets: Vec<SetLog>) -> ExerciseLog {
        ExerciseLog {
            exercise_name: name.to_string(),
            sets,
            notes: String::new(),
            skipped: None,
            replaced_with: None,
        }
    }

    pub fn set_log(set_number: u32, weight: Option<f64>, reps: Option<u32>, completed: bool) -> SetLog {
        SetLog { set_number, weight, reps, completed, timestamp: None }
    }
}
