use anyhow::{bail, Result};
use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::dates::to_iso_string;
use crate::models::{ActiveWorkout, UserProgress, WorkoutLog};
use crate::program::DEFAULT_DELOAD_INTERVAL_WEEKS;

const PROGRESS_KEY: &str = "progress";
const ACTIVE_WORKOUT_KEY_PREFIX: &str = "active-workout";

fn active_workout_key(day_number: u32) -> String {
    format!("{}-{}", ACTIVE_WORKOUT_KEY_PREFIX, day_number)
}

async fn kv_get(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    Ok(sqlx::query_scalar::<_, String>("SELECT value FROM kv WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?)
}

async fn kv_put(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO kv (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

async fn kv_delete(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM kv WHERE key = ?").bind(key).execute(pool).await?;
    Ok(())
}

/* ───────────────────────────── progress ─────────────────────────────── */

/// Load the persisted progress document. A missing or unreadable document
/// falls back to a fresh state anchored at today; storage failures still
/// surface as errors.
pub async fn load_progress(pool: &SqlitePool, today: NaiveDate) -> Result<UserProgress> {
    let default = || UserProgress::new(to_iso_string(today), DEFAULT_DELOAD_INTERVAL_WEEKS);
    match kv_get(pool, PROGRESS_KEY).await? {
        Some(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|_| default())),
        None => Ok(default()),
    }
}

pub async fn save_progress(pool: &SqlitePool, progress: &UserProgress) -> Result<()> {
    kv_put(pool, PROGRESS_KEY, &serde_json::to_string(progress)?).await
}

/// Append a finished log, stamping it with the next sequence number. Logs
/// are never edited or removed after this point.
pub fn append_workout_log(progress: &mut UserProgress, mut log: WorkoutLog) {
    log.seq = progress.next_seq();
    progress.workout_logs.push(log);
}

/// Add the date to the explicit rest list, or remove it if already there.
pub fn toggle_rest_day(progress: &mut UserProgress, date: &str) {
    if let Some(pos) = progress.rest_days.iter().position(|d| d == date) {
        progress.rest_days.remove(pos);
    } else {
        progress.rest_days.push(date.to_string());
        progress.rest_days.sort();
    }
}

pub fn start_deload(progress: &mut UserProgress) {
    progress.is_deload_week = true;
}

/// Close out an active deload: the interval clock restarts from today.
pub fn end_deload(progress: &mut UserProgress, today: NaiveDate) {
    progress.is_deload_week = false;
    progress.last_deload_date = Some(to_iso_string(today));
}

/// Push the next scheduled deload out without actually deloading.
pub fn record_deload(progress: &mut UserProgress, today: NaiveDate) {
    progress.last_deload_date = Some(to_iso_string(today));
}

/* ──────────────────────── active workout sessions ───────────────────── */

/// In-flight session for a program day, or None when absent or when the
/// stored JSON no longer parses.
pub async fn load_active_workout(pool: &SqlitePool, day_number: u32) -> Result<Option<ActiveWorkout>> {
    match kv_get(pool, &active_workout_key(day_number)).await? {
        Some(raw) => Ok(serde_json::from_str(&raw).ok()),
        None => Ok(None),
    }
}

pub async fn save_active_workout(pool: &SqlitePool, workout: &ActiveWorkout) -> Result<()> {
    kv_put(pool, &active_workout_key(workout.day_number), &serde_json::to_string(workout)?).await
}

pub async fn clear_active_workout(pool: &SqlitePool, day_number: u32) -> Result<()> {
    kv_delete(pool, &active_workout_key(day_number)).await
}

/// Day numbers with a stored in-flight session, sorted.
pub async fn active_workout_days(pool: &SqlitePool) -> Result<Vec<u32>> {
    let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM kv WHERE key LIKE ?")
        .bind(format!("{}-%", ACTIVE_WORKOUT_KEY_PREFIX))
        .fetch_all(pool)
        .await?;

    let mut days: Vec<u32> = keys
        .iter()
        .filter_map(|k| k.strip_prefix(ACTIVE_WORKOUT_KEY_PREFIX))
        .filter_map(|rest| rest.strip_prefix('-'))
        .filter_map(|n| n.parse().ok())
        .collect();
    days.sort_unstable();
    Ok(days)
}

pub async fn clear_all_active_workouts(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM kv WHERE key LIKE ?")
        .bind(format!("{}-%", ACTIVE_WORKOUT_KEY_PREFIX))
        .execute(pool)
        .await?;
    Ok(())
}

/// Drop the progress document and every in-flight session.
pub async fn reset_all(pool: &SqlitePool) -> Result<()> {
    kv_delete(pool, PROGRESS_KEY).await?;
    clear_all_active_workouts(pool).await
}

/* ─────────────────────────── import / export ────────────────────────── */

/// Whole-state backup as pretty JSON, readable by the web app and by
/// `import_data`.
pub async fn export_data(pool: &SqlitePool, today: NaiveDate) -> Result<String> {
    let progress = load_progress(pool, today).await?;
    Ok(serde_json::to_string_pretty(&progress)?)
}

/// Replace the stored progress with an imported backup. The document is
/// validated structurally first; nothing is written when it is rejected.
pub async fn import_data(pool: &SqlitePool, json: &str) -> Result<UserProgress> {
    let value: serde_json::Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => bail!("Not valid JSON: {}", e),
    };

    if !value.get("currentCycle").is_some_and(|v| v.is_number()) {
        bail!("Backup is missing a numeric 'currentCycle'");
    }
    if !value.get("cycleStartDate").is_some_and(|v| v.is_string()) {
        bail!("Backup is missing a 'cycleStartDate' string");
    }
    if !value.get("deloadIntervalWeeks").is_some_and(|v| v.is_number()) {
        bail!("Backup is missing a numeric 'deloadIntervalWeeks'");
    }
    if !value.get("workoutLogs").is_some_and(|v| v.is_array()) {
        bail!("Backup is missing a 'workoutLogs' array");
    }

    let mut progress: UserProgress =
        serde_json::from_value(value).map_err(|e| anyhow::anyhow!("Malformed backup: {}", e))?;

    // Web-app exports predate sequence numbers. Stamp unnumbered logs in
    // stored order so same-date ties keep resolving the same way.
    let mut next = progress.workout_logs.iter().map(|l| l.seq).max().unwrap_or(0) + 1;
    for log in &mut progress.workout_logs {
        if log.seq == 0 {
            log.seq = next;
            next += 1;
        }
    }

    save_progress(pool, &progress).await?;
    Ok(progress)
}
