use serde::{Deserialize, Serialize};

/// Root persisted state. Everything the projection engine needs lives here;
/// the engine never reaches into storage itself.
///
/// Serialized as camelCase JSON so backups from the original web app import
/// cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub current_cycle: u32,
    /// Anchor for deload scheduling when no deload has ever been recorded.
    pub cycle_start_date: String,
    pub deload_interval_weeks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deload_date: Option<String>,
    /// True while the user is actively in a deload period.
    #[serde(default)]
    pub is_deload_week: bool,
    #[serde(default)]
    pub workout_logs: Vec<WorkoutLog>,
    /// Dates the user explicitly marked as rest (ISO, deduplicated).
    #[serde(default)]
    pub rest_days: Vec<String>,
}

impl UserProgress {
    pub fn new(cycle_start_date: String, deload_interval_weeks: u32) -> Self {
        Self {
            current_cycle: 1,
            cycle_start_date,
            deload_interval_weeks,
            last_deload_date: None,
            is_deload_week: false,
            workout_logs: Vec::new(),
            rest_days: Vec::new(),
        }
    }

    /// Next value for `WorkoutLog::seq`: one past the highest seen so far.
    pub fn next_seq(&self) -> u64 {
        self.workout_logs.iter().map(|l| l.seq).max().map_or(1, |s| s + 1)
    }
}

/// A finished (or abandoned) workout. Immutable once appended. Only logs
/// with `completed == true` participate in projection, volume totals, and
/// PR comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    /// Monotonically increasing append counter. Breaks "most recent" ties
    /// between logs that share a date; ids are not ordered.
    #[serde(default)]
    pub seq: u64,
    pub date: String,
    pub cycle: u32,
    pub day_number: u32,
    pub day_name: String,
    pub exercises: Vec<ExerciseLog>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<f64>,
    /// Session length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deload: Option<bool>,
}

impl WorkoutLog {
    pub fn is_deload(&self) -> bool {
        self.is_deload.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub exercise_name: String,
    pub sets: Vec<SetLog>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    /// Name of the substitute exercise actually performed, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced_with: Option<String>,
}

impl ExerciseLog {
    pub fn is_skipped(&self) -> bool {
        self.skipped.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLog {
    /// 1-based.
    pub set_number: u32,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub reps: Option<u32>,
    pub completed: bool,
    /// Epoch millis when the set was logged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Transient in-progress workout, persisted under a day-scoped key so a
/// session survives process restarts. Destroyed on finish or cancel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveWorkout {
    pub day_number: u32,
    pub cycle: u32,
    pub exercises: Vec<ExerciseLog>,
    /// Epoch millis. Elapsed time is recomputed from the wall clock, never
    /// accumulated, so it stays correct across suspends.
    pub start_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_timer: Option<RestTimerState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestTimerState {
    pub exercise_index: usize,
    pub set_index: usize,
    /// Epoch millis.
    pub started_at: i64,
    /// Seconds.
    pub duration: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_json_shape_is_camel_case() {
        let progress = UserProgress::new("2026-01-01".to_string(), 5);
        let json = serde_json::to_value(&progress).unwrap();
        assert!(json.get("currentCycle").is_some());
        assert!(json.get("cycleStartDate").is_some());
        assert!(json.get("deloadIntervalWeeks").is_some());
        assert!(json.get("workoutLogs").is_some());
        assert!(json.get("restDays").is_some());
    }

    #[test]
    fn test_log_accepts_original_app_json() {
        // A log exported by the web app: no seq, optional fields missing.
        let raw = r#"{
            "id": "abc-123",
            "date": "2026-02-01",
            "cycle": 1,
            "dayNumber": 2,
            "dayName": "Push",
            "exercises": [{
                "exerciseName": "Pec Deck",
                "sets": [{"setNumber": 1, "weight": 120, "reps": 10, "completed": true}],
                "notes": ""
            }],
            "completed": true
        }"#;
        let log: WorkoutLog = serde_json::from_str(raw).unwrap();
        assert_eq!(log.seq, 0);
        assert_eq!(log.day_number, 2);
        assert!(!log.is_deload());
        assert_eq!(log.exercises[0].sets[0].weight, Some(120.0));
    }

    #[test]
    fn test_next_seq_increments_past_max() {
        let mut progress = UserProgress::new("2026-01-01".to_string(), 5);
        assert_eq!(progress.next_seq(), 1);
        progress.workout_logs.push(WorkoutLog {
            id: "x".into(),
            seq: 7,
            date: "2026-01-02".into(),
            cycle: 1,
            day_number: 1,
            day_name: "Pull".into(),
            exercises: vec![],
            completed: true,
            total_volume: None,
            duration: None,
            session_notes: None,
            is_deload: None,
        });
        assert_eq!(progress.next_seq(), 8);
    }
}
