use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{add_days, format_week_range, monday_of, parse_iso_date, to_iso_string};
use crate::engine::deload::{calculate_deload_weeks, DEFAULT_DELOAD_DISPLAY_COUNT};
use crate::engine::frequency::{estimate_frequency, FrequencyEstimate};
use crate::models::{UserProgress, WorkoutLog};
use crate::program::{self, DAYS_PER_CYCLE};

/// Future slots generated per projection. Daily training at the default
/// cadence covers roughly two deload cycles ahead.
const PROJECTION_SLOT_COUNT: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarCellType {
    PastCompleted,
    PastMissed,
    Today,
    Projected,
    Rest,
    Deload,
    ExplicitRest,
}

/// Workout attached to a cell: either the log that was completed there or
/// the projected program day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellWorkout {
    pub day_number: u32,
    pub day_name: String,
    pub cycle: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<WorkoutLog>,
    #[serde(default)]
    pub is_deload: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: String,
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week: u32,
    pub is_today: bool,
    #[serde(rename = "type")]
    pub cell_type: CalendarCellType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout: Option<CellWorkout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarWeekRow {
    pub week_label: String,
    /// Monday, ISO.
    pub week_start_date: String,
    pub is_current_week: bool,
    pub is_deload_week: bool,
    pub cells: Vec<CalendarCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextWorkout {
    pub day_number: u32,
    pub day_name: String,
    pub cycle: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarProjection {
    pub frequency: FrequencyEstimate,
    pub weeks: Vec<CalendarWeekRow>,
    pub next_workout: NextWorkout,
}

/// First program day in the current cycle without a completed log. This is
/// gap-filling, not sequential: skipping day 3 and logging day 4 still
/// offers day 3 next. A fully completed cycle rolls over to day 1 of the
/// next one.
pub fn next_workout_day(progress: &UserProgress) -> (u32, u32) {
    let completed_in_cycle: HashSet<u32> = progress
        .workout_logs
        .iter()
        .filter(|l| l.cycle == progress.current_cycle && l.completed)
        .map(|l| l.day_number)
        .collect();

    for day in 1..=DAYS_PER_CYCLE {
        if !completed_in_cycle.contains(&day) {
            return (day, progress.current_cycle);
        }
    }
    (1, progress.current_cycle + 1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedDay {
    pub date: String,
    pub day_number: u32,
    pub cycle: u32,
    pub day_name: String,
}

/// Deterministic forward walk: program days advance one at a time (wrapping
/// into the next cycle), dates advance by the rounded average gap. A cadence
/// approximation, deliberately blind to weekends.
pub fn project_future_days(
    start_date: NaiveDate,
    start_cycle: u32,
    start_day: u32,
    avg_days_between: f64,
    count: usize,
) -> Vec<ProjectedDay> {
    let step = avg_days_between.round() as i64;
    let mut result = Vec::with_capacity(count);
    let mut date = start_date;
    let mut day = start_day;
    let mut cycle = start_cycle;

    for _ in 0..count {
        result.push(ProjectedDay {
            date: to_iso_string(date),
            day_number: day,
            cycle,
            day_name: program::day_name(day),
        });

        day += 1;
        if day > DAYS_PER_CYCLE {
            day = 1;
            cycle += 1;
        }
        date = add_days(date, step);
    }

    result
}

/// Fold the full training picture into Monday-aligned week rows: recent
/// history, today, projected sessions, and upcoming deload weeks.
pub fn build_calendar_projection(progress: &UserProgress, today: NaiveDate) -> CalendarProjection {
    let today_str = to_iso_string(today);
    let frequency = estimate_frequency(&progress.workout_logs, today);
    let (next_day, next_cycle) = next_workout_day(progress);

    // An active deload is ended manually, so no future deloads are projected
    // while one is running; the current week is flagged instead.
    let deload_weeks = if progress.is_deload_week {
        Vec::new()
    } else {
        calculate_deload_weeks(progress, DEFAULT_DELOAD_DISPLAY_COUNT, today)
    };

    let mut deload_dates: HashSet<String> = HashSet::new();
    for dw in &deload_weeks {
        if let Some(start) = parse_iso_date(&dw.start_date) {
            for i in 0..7 {
                deload_dates.insert(to_iso_string(add_days(start, i)));
            }
        }
    }

    let rest_dates: HashSet<&str> = progress.rest_days.iter().map(String::as_str).collect();

    // Most recent completed log per date; seq breaks same-date ties.
    let mut log_by_date: HashMap<&str, &WorkoutLog> = HashMap::new();
    for log in &progress.workout_logs {
        if !log.completed {
            continue;
        }
        match log_by_date.get(log.date.as_str()) {
            Some(existing) if existing.seq >= log.seq => {}
            _ => {
                log_by_date.insert(log.date.as_str(), log);
            }
        }
    }

    // A rest day today pushes the projection to start tomorrow.
    let projection_start =
        if rest_dates.contains(today_str.as_str()) { add_days(today, 1) } else { today };

    let projected = project_future_days(
        projection_start,
        next_cycle,
        next_day,
        frequency.avg_days_between_workouts,
        PROJECTION_SLOT_COUNT,
    );

    let mut projected_by_date: HashMap<String, &ProjectedDay> = HashMap::new();
    for pd in &projected {
        if deload_dates.contains(&pd.date) || rest_dates.contains(pd.date.as_str()) {
            continue;
        }
        projected_by_date.entry(pd.date.clone()).or_insert(pd);
    }

    let range_start = monday_of(add_days(today, -21));
    let range_end = match deload_weeks.last() {
        Some(dw) => parse_iso_date(&dw.end_date).unwrap_or(today),
        None => add_days(today, 28),
    };
    let range_end_sunday = add_days(monday_of(range_end), 6);

    let current_monday_str = to_iso_string(monday_of(today));

    let mut weeks = Vec::new();
    let mut week_monday = range_start;
    while week_monday <= range_end_sunday {
        let monday_str = to_iso_string(week_monday);
        let is_current_week = monday_str == current_monday_str;
        let is_deload_week = (progress.is_deload_week && is_current_week)
            || deload_weeks.iter().any(|dw| dw.start_date == monday_str);

        let mut cells = Vec::with_capacity(7);
        for dow in 0..7u32 {
            let cell_date = add_days(week_monday, dow as i64);
            let cell_date_str = to_iso_string(cell_date);
            let is_today = cell_date_str == today_str;
            let is_past = cell_date < today;

            let (cell_type, workout) = if let Some(log) = log_by_date.get(cell_date_str.as_str()) {
                // A completed log always wins, even inside deload weeks or
                // on explicit rest dates.
                (
                    CalendarCellType::PastCompleted,
                    Some(CellWorkout {
                        day_number: log.day_number,
                        day_name: log.day_name.clone(),
                        cycle: log.cycle,
                        log: Some((*log).clone()),
                        is_deload: log.is_deload(),
                    }),
                )
            } else if rest_dates.contains(cell_date_str.as_str()) {
                (CalendarCellType::ExplicitRest, None)
            } else if is_today {
                (CalendarCellType::Today, projected_by_date.get(&cell_date_str).copied().map(projected_workout))
            } else if is_deload_week && !is_past {
                (CalendarCellType::Deload, None)
            } else if !is_past && projected_by_date.contains_key(&cell_date_str) {
                let pd = projected_by_date[&cell_date_str];
                (CalendarCellType::Projected, Some(projected_workout(pd)))
            } else if is_past {
                (CalendarCellType::PastMissed, None)
            } else {
                (CalendarCellType::Rest, None)
            };

            cells.push(CalendarCell { date: cell_date_str, day_of_week: dow, is_today, cell_type, workout });
        }

        let week_label = if is_current_week {
            "This Week".to_string()
        } else if is_deload_week {
            "Deload Week".to_string()
        } else {
            format_week_range(week_monday)
        };

        weeks.push(CalendarWeekRow {
            week_label,
            week_start_date: monday_str,
            is_current_week,
            is_deload_week,
            cells,
        });

        week_monday = add_days(week_monday, 7);
    }

    CalendarProjection {
        frequency,
        weeks,
        next_workout: NextWorkout {
            day_number: next_day,
            day_name: program::day_name(next_day),
            cycle: next_cycle,
        },
    }
}

fn projected_workout(pd: &ProjectedDay) -> CellWorkout {
    CellWorkout {
        day_number: pd.day_number,
        day_name: pd.day_name.clone(),
        cycle: pd.cycle,
        log: None,
        is_deload: false,
    }
}
