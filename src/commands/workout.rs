use anyhow::Result;
use chrono::{Local, Utc};
use colored::Colorize;
use sqlx::SqlitePool;
use strsim::jaro_winkler;
use uuid::Uuid;

use crate::cli::WorkoutCmd;
use crate::dates::{format_relative_date, parse_iso_date, to_iso_string};
use crate::engine::validator::validate_workout_completion;
use crate::engine::volume::{
    calculate_total_volume, calculate_workout_volume, format_volume, format_weight, input_to_lbs,
};
use crate::engine::{find_previous_workout, is_set_pr, next_workout_day};
use crate::models::{ActiveWorkout, ExerciseLog, RestTimerState, SetLog, WorkoutLog};
use crate::program::{self, Exercise};
use crate::storage;
use crate::types::{Config, WeightUnit};

pub async fn handle(cmd: WorkoutCmd, pool: &SqlitePool, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let config = Config::load(&crate::types::config_path()?)?;
    let unit = config.unit();

    match cmd {
        WorkoutCmd::Start { day } => start(pool, day, today).await,
        WorkoutCmd::Show => show(pool, unit, json).await,
        WorkoutCmd::Set { exercise, weight, reps, set } => {
            log_set(pool, today, unit, exercise, weight, reps, set).await
        }
        WorkoutCmd::Skip { exercise } => skip(pool, exercise).await,
        WorkoutCmd::Replace { exercise, substitute } => replace(pool, exercise, substitute).await,
        WorkoutCmd::Note { exercise, note: text } => note(pool, exercise, text).await,
        WorkoutCmd::Rest { exercise } => rest(pool, exercise).await,
        WorkoutCmd::Timer => timer(pool).await,
        WorkoutCmd::Cancel => cancel(pool).await,
        WorkoutCmd::Finish { notes, force } => finish(pool, today, unit, notes, force).await,
        WorkoutCmd::Log { date } => show_log(pool, today, unit, date, json).await,
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// The one in-flight session, if any. Multiple concurrent sessions get a
/// warning and the lowest day wins.
async fn current_session(pool: &SqlitePool) -> Result<Option<ActiveWorkout>> {
    let days = storage::active_workout_days(pool).await?;
    match days.as_slice() {
        [] => Ok(None),
        [day] => storage::load_active_workout(pool, *day).await,
        [first, ..] => {
            println!(
                "{} multiple active sessions (days {}), using day {}",
                "warning:".yellow().bold(),
                days.iter().map(u32::to_string).collect::<Vec<_>>().join(", "),
                first
            );
            storage::load_active_workout(pool, *first).await
        }
    }
}

fn fresh_session(day_number: u32, cycle: u32) -> ActiveWorkout {
    let exercises = program::get_exercises_for_day(day_number)
        .iter()
        .map(|e| ExerciseLog {
            exercise_name: e.name.to_string(),
            sets: (1..=e.sets)
                .map(|n| SetLog { set_number: n, weight: None, reps: None, completed: false, timestamp: None })
                .collect(),
            notes: String::new(),
            skipped: None,
            replaced_with: None,
        })
        .collect();

    ActiveWorkout { day_number, cycle, exercises, start_time: now_ms(), rest_timer: None }
}

async fn start(pool: &SqlitePool, day: Option<u32>, today: chrono::NaiveDate) -> Result<()> {
    let progress = storage::load_progress(pool, today).await?;
    let (next_day, next_cycle) = next_workout_day(&progress);
    let day_number = day.unwrap_or(next_day);

    if program::get_workout_day(day_number).is_none() {
        println!(
            "{} no program day {} (valid: 1-{})",
            "error:".red().bold(),
            day_number,
            program::DAYS_PER_CYCLE
        );
        return Ok(());
    }

    if let Some(existing) = storage::load_active_workout(pool, day_number).await? {
        println!(
            "{} resuming {} session started earlier",
            "info:".blue().bold(),
            program::day_name(existing.day_number).bold()
        );
        return Ok(());
    }

    let cycle = if day_number == next_day { next_cycle } else { progress.current_cycle };
    let session = fresh_session(day_number, cycle);
    storage::save_active_workout(pool, &session).await?;

    println!(
        "{} started {} (cycle {}), {} exercises",
        "ok:".green().bold(),
        program::day_name(day_number).bold(),
        cycle,
        session.exercises.len()
    );
    if progress.is_deload_week {
        println!("{} deload week — this session will be logged as a deload", "info:".blue().bold());
    }
    Ok(())
}

async fn show(pool: &SqlitePool, unit: WeightUnit, json: bool) -> Result<()> {
    let Some(session) = current_session(pool).await? else {
        println!("{} no active session", "error:".red().bold());
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    let today = Local::now().date_naive();
    let progress = storage::load_progress(pool, today).await?;
    let previous = find_previous_workout(&progress.workout_logs, session.day_number, "");

    println!(
        "{} {}",
        program::day_name(session.day_number).cyan().bold(),
        format!("(cycle {})", session.cycle).dimmed()
    );
    print_exercises(&session.exercises, session.day_number, previous, unit);

    let volume = calculate_total_volume(&session.exercises);
    if volume > 0.0 {
        println!("\nvolume so far: {}", format_volume(volume, unit).bold());
    }
    Ok(())
}

fn print_exercises(
    exercises: &[ExerciseLog],
    day_number: u32,
    previous: Option<&WorkoutLog>,
    unit: WeightUnit,
) {
    let program_slots = program::get_exercises_for_day(day_number);

    for (i, ex) in exercises.iter().enumerate() {
        let slot: Option<&Exercise> = program_slots.get(i);
        let badge = slot.map_or_else(String::new, |s| {
            format!(" [{}]", s.category).color(s.category.badge_color()).to_string()
        });
        let side = if slot.is_some_and(|s| s.per_side) { " (each side)".dimmed().to_string() } else { String::new() };

        let name = match &ex.replaced_with {
            Some(sub) => format!("{} {} {}", ex.exercise_name.strikethrough(), "→".dimmed(), sub.bold()),
            None => ex.exercise_name.bold().to_string(),
        };
        let reps_hint = slot.map_or_else(String::new, |s| format!(" {}", s.reps.dimmed()));
        let optional = if slot.is_some_and(|s| s.optional) { " (optional)".dimmed().to_string() } else { String::new() };

        let number = slot.map_or(i as u32 + 1, |s| s.order);
        println!("{}. {}{}{}{}{}", number, name, badge, side, reps_hint, optional);
        if let Some(slot) = slot {
            if !slot.notes.is_empty() {
                println!("   {}", slot.notes.dimmed());
            }
        }

        if ex.is_skipped() {
            println!("   {}", "skipped".yellow());
            continue;
        }

        for set in &ex.sets {
            let mark = if set.completed { "[x]".green().to_string() } else { "[ ]".dimmed().to_string() };
            let detail = match (set.weight, set.reps) {
                (Some(w), Some(r)) => {
                    let pr = is_set_pr(previous, &ex.exercise_name, set.weight, set.reps, set.completed);
                    let star = if pr { " ★".yellow().bold().to_string() } else { String::new() };
                    format!("{} × {}{}", format_weight(w, unit), r, star)
                }
                _ => "—".dimmed().to_string(),
            };
            println!("   {} {}. {}", mark, set.set_number, detail);
        }

        if let Some(prev) = previous {
            if let Some(prev_ex) = prev.exercises.iter().find(|p| p.exercise_name == ex.exercise_name) {
                let last: Vec<String> = prev_ex
                    .sets
                    .iter()
                    .filter(|s| s.completed)
                    .filter_map(|s| Some(format!("{}×{}", s.weight?, s.reps?)))
                    .collect();
                if !last.is_empty() {
                    println!("   {}", format!("last: {}", last.join(", ")).dimmed());
                }
            }
        }

        if !ex.notes.is_empty() {
            println!("   {}", format!("note: {}", ex.notes).italic());
        }
    }
}

/// Look up the exercise slot, 1-based, with a friendly error.
fn exercise_at(session: &mut ActiveWorkout, index: usize) -> Option<usize> {
    if index == 0 || index > session.exercises.len() {
        println!(
            "{} no exercise at index {} (session has {})",
            "error:".red().bold(),
            index,
            session.exercises.len()
        );
        return None;
    }
    Some(index - 1)
}

async fn log_set(
    pool: &SqlitePool,
    today: chrono::NaiveDate,
    unit: WeightUnit,
    exercise: usize,
    weight: f64,
    reps: u32,
    set: Option<usize>,
) -> Result<()> {
    let Some(mut session) = current_session(pool).await? else {
        println!("{} no active session", "error:".red().bold());
        return Ok(());
    };
    let Some(idx) = exercise_at(&mut session, exercise) else { return Ok(()) };

    let slot_count = session.exercises[idx].sets.len();
    let set_idx = match set {
        Some(n) => {
            if n == 0 || n > slot_count {
                println!("{} no set {} (exercise has {})", "error:".red().bold(), n, slot_count);
                return Ok(());
            }
            n - 1
        }
        None => match session.exercises[idx].sets.iter().position(|s| !s.completed) {
            Some(p) => p,
            None => {
                println!("{} all sets already logged (use --set to overwrite)", "warning:".yellow().bold());
                return Ok(());
            }
        },
    };

    let stored_lbs = input_to_lbs(weight, unit);
    {
        let slot = &mut session.exercises[idx].sets[set_idx];
        slot.weight = Some(stored_lbs);
        slot.reps = Some(reps);
        slot.completed = true;
        slot.timestamp = Some(now_ms());
    }

    // PR check against the previous session for this program day.
    let progress = storage::load_progress(pool, today).await?;
    let previous = find_previous_workout(&progress.workout_logs, session.day_number, "");
    let exercise_name = session.exercises[idx].exercise_name.clone();
    let pr = is_set_pr(previous, &exercise_name, Some(stored_lbs), Some(reps), true);

    // Rest timer starts automatically once a set goes in.
    let rest_secs = program::get_exercises_for_day(session.day_number)
        .get(idx)
        .map_or(90, |e| e.category.rest_timer_secs());
    session.rest_timer = Some(RestTimerState {
        exercise_index: idx,
        set_index: set_idx,
        started_at: now_ms(),
        duration: rest_secs,
    });

    storage::save_active_workout(pool, &session).await?;

    println!(
        "{} {} set {}: {} × {}",
        "ok:".green().bold(),
        exercise_name.bold(),
        set_idx + 1,
        format_weight(stored_lbs, unit),
        reps
    );
    if pr {
        println!("{} new personal record!", "note:".yellow().bold());
    }
    println!("{} rest {}s", "info:".blue().bold(), rest_secs);
    Ok(())
}

async fn skip(pool: &SqlitePool, exercise: usize) -> Result<()> {
    let Some(mut session) = current_session(pool).await? else {
        println!("{} no active session", "error:".red().bold());
        return Ok(());
    };
    let Some(idx) = exercise_at(&mut session, exercise) else { return Ok(()) };

    session.exercises[idx].skipped = Some(true);
    storage::save_active_workout(pool, &session).await?;
    println!("{} skipped {}", "ok:".green().bold(), session.exercises[idx].exercise_name.bold());
    Ok(())
}

async fn replace(pool: &SqlitePool, exercise: usize, substitute: String) -> Result<()> {
    let Some(mut session) = current_session(pool).await? else {
        println!("{} no active session", "error:".red().bold());
        return Ok(());
    };
    let Some(idx) = exercise_at(&mut session, exercise) else { return Ok(()) };

    let known = program::all_exercise_names();
    if !known.contains(&substitute.as_str()) {
        let suggestion = known
            .iter()
            .map(|n| (*n, jaro_winkler(&substitute.to_lowercase(), &n.to_lowercase())))
            .filter(|(_, score)| *score > 0.85)
            .max_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((name, _)) = suggestion {
            println!("{} `{}` is not in the program (did you mean `{}`?)", "warning:".yellow().bold(), substitute, name.green());
        }
    }

    session.exercises[idx].replaced_with = Some(substitute.clone());
    storage::save_active_workout(pool, &session).await?;
    println!(
        "{} {} → {}",
        "ok:".green().bold(),
        session.exercises[idx].exercise_name.dimmed(),
        substitute.bold()
    );
    Ok(())
}

async fn note(pool: &SqlitePool, exercise: usize, note: String) -> Result<()> {
    let Some(mut session) = current_session(pool).await? else {
        println!("{} no active session", "error:".red().bold());
        return Ok(());
    };
    let Some(idx) = exercise_at(&mut session, exercise) else { return Ok(()) };

    session.exercises[idx].notes = note;
    storage::save_active_workout(pool, &session).await?;
    println!("{} note saved on {}", "ok:".green().bold(), session.exercises[idx].exercise_name.bold());
    Ok(())
}

async fn rest(pool: &SqlitePool, exercise: usize) -> Result<()> {
    let Some(mut session) = current_session(pool).await? else {
        println!("{} no active session", "error:".red().bold());
        return Ok(());
    };
    let Some(idx) = exercise_at(&mut session, exercise) else { return Ok(()) };

    let secs = program::get_exercises_for_day(session.day_number)
        .get(idx)
        .map_or(90, |e| e.category.rest_timer_secs());
    session.rest_timer = Some(RestTimerState { exercise_index: idx, set_index: 0, started_at: now_ms(), duration: secs });
    storage::save_active_workout(pool, &session).await?;
    println!("{} rest timer started: {}s", "ok:".green().bold(), secs);
    Ok(())
}

fn format_elapsed(ms: i64) -> String {
    let secs = (ms / 1000).max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

async fn timer(pool: &SqlitePool) -> Result<()> {
    let Some(session) = current_session(pool).await? else {
        println!("{} no active session", "error:".red().bold());
        return Ok(());
    };

    // Elapsed time always derives from the stored start, never a counter.
    println!("session: {}", format_elapsed(now_ms() - session.start_time).bold());

    if let Some(rt) = &session.rest_timer {
        let elapsed_secs = (now_ms() - rt.started_at) / 1000;
        let remaining = rt.duration as i64 - elapsed_secs;
        let exercise = session
            .exercises
            .get(rt.exercise_index)
            .map_or("?", |e| e.exercise_name.as_str());
        if remaining > 0 {
            println!("rest: {}s left ({})", remaining.to_string().bold(), exercise.dimmed());
        } else {
            println!("rest: {} ({})", "done".green().bold(), exercise.dimmed());
        }
    }
    Ok(())
}

async fn cancel(pool: &SqlitePool) -> Result<()> {
    let Some(session) = current_session(pool).await? else {
        println!("{} no active session to cancel", "error:".red().bold());
        return Ok(());
    };
    storage::clear_active_workout(pool, session.day_number).await?;
    println!("{} cancelled {} session", "ok:".green().bold(), program::day_name(session.day_number).bold());
    Ok(())
}

async fn finish(
    pool: &SqlitePool,
    today: chrono::NaiveDate,
    unit: WeightUnit,
    notes: Option<String>,
    force: bool,
) -> Result<()> {
    let Some(session) = current_session(pool).await? else {
        println!("{} no active session", "error:".red().bold());
        return Ok(());
    };

    let validation = validate_workout_completion(
        &session.exercises,
        program::get_exercises_for_day(session.day_number),
    );
    if !validation.is_valid && !force {
        for msg in validation.messages() {
            println!("{} {}", "warning:".yellow().bold(), msg);
        }
        println!("{} session not finished (use --force to log it anyway)", "error:".red().bold());
        return Ok(());
    }

    let mut progress = storage::load_progress(pool, today).await?;
    let id = Uuid::new_v4().to_string();
    let previous = find_previous_workout(&progress.workout_logs, session.day_number, &id);

    let log = WorkoutLog {
        id,
        seq: 0,
        date: to_iso_string(today),
        cycle: session.cycle,
        day_number: session.day_number,
        day_name: program::day_name(session.day_number),
        exercises: session.exercises.clone(),
        completed: true,
        total_volume: Some(calculate_total_volume(&session.exercises)),
        duration: Some(((now_ms() - session.start_time) / 1000).max(0) as u64),
        session_notes: notes,
        is_deload: progress.is_deload_week.then_some(true),
    };

    let prs = count_prs(&log, previous);
    let volume = calculate_workout_volume(&log);
    storage::append_workout_log(&mut progress, log);
    storage::save_progress(pool, &progress).await?;
    storage::clear_active_workout(pool, session.day_number).await?;

    println!(
        "{} logged {} (cycle {}): {}",
        "ok:".green().bold(),
        program::day_name(session.day_number).bold(),
        session.cycle,
        format_volume(volume, unit)
    );
    if prs > 0 {
        println!("{} {} personal record{}!", "note:".yellow().bold(), prs, if prs == 1 { "" } else { "s" });
    }
    Ok(())
}

fn count_prs(log: &WorkoutLog, previous: Option<&WorkoutLog>) -> usize {
    log.exercises
        .iter()
        .filter(|ex| !ex.is_skipped())
        .flat_map(|ex| ex.sets.iter().map(move |s| (ex, s)))
        .filter(|(ex, s)| is_set_pr(previous, &ex.exercise_name, s.weight, s.reps, s.completed))
        .count()
}

async fn show_log(
    pool: &SqlitePool,
    today: chrono::NaiveDate,
    unit: WeightUnit,
    date: String,
    json: bool,
) -> Result<()> {
    let Some(parsed) = parse_iso_date(&date) else {
        println!("{} invalid date `{}` (expected YYYY-MM-DD)", "error:".red().bold(), date);
        return Ok(());
    };

    let progress = storage::load_progress(pool, today).await?;
    let logs: Vec<&WorkoutLog> =
        progress.workout_logs.iter().filter(|l| l.date == date && l.completed).collect();

    if logs.is_empty() {
        println!("{} no completed workout on {}", "warning:".yellow().bold(), date);
        return Ok(());
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&logs)?);
        return Ok(());
    }

    for log in logs {
        let previous = find_previous_workout(&progress.workout_logs, log.day_number, &log.id);
        println!(
            "{} {} {}",
            log.day_name.cyan().bold(),
            format!("(cycle {})", log.cycle).dimmed(),
            format_relative_date(parsed, today).dimmed()
        );
        if log.is_deload() {
            println!("{}", "deload session".cyan());
        }
        print_exercises(&log.exercises, log.day_number, previous, unit);

        if let Some(v) = log.total_volume {
            println!("\nvolume: {}", format_volume(v, unit).bold());
        }
        if let Some(d) = log.duration {
            println!("duration: {}", format_elapsed(d as i64 * 1000));
        }
        if let Some(n) = &log.session_notes {
            println!("notes: {}", n.italic());
        }
        println!();
    }
    Ok(())
}
