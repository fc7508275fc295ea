use std::collections::BTreeMap;

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::dates::{add_days, monday_of, parse_iso_date, to_iso_string};
use crate::engine::frequency::Confidence;
use crate::engine::volume::{convert_weight, format_volume, format_weight};
use crate::engine::{
    deload_due, estimate_frequency, find_previous_workout, get_current_cycle_volume, is_set_pr,
};
use crate::models::UserProgress;
use crate::storage;
use crate::types::{Config, WeightUnit};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusSummary {
    current_cycle: u32,
    cycle_volume: crate::engine::VolumeData,
    workouts_per_week: f64,
    confidence: Confidence,
    deload_due: bool,
    is_deload_week: bool,
    prs_this_cycle: Vec<PrEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrEntry {
    exercise: String,
    weight: f64,
    date: String,
}

pub async fn handle(pool: &SqlitePool, graph: bool, weeks: u32, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let config = Config::load(&crate::types::config_path()?)?;
    let unit = config.unit();
    let progress = storage::load_progress(pool, today).await?;

    if graph {
        render_volume_graph(&progress, weeks, unit, today);
        return Ok(());
    }

    let frequency = estimate_frequency(&progress.workout_logs, today);
    let volume = get_current_cycle_volume(&progress.workout_logs, progress.current_cycle);
    let prs = prs_this_cycle(&progress);

    if json {
        let summary = StatusSummary {
            current_cycle: progress.current_cycle,
            cycle_volume: volume,
            workouts_per_week: frequency.workouts_per_week,
            confidence: frequency.confidence,
            deload_due: deload_due(&progress, today),
            is_deload_week: progress.is_deload_week,
            prs_this_cycle: prs
                .into_iter()
                .map(|(exercise, weight, date)| PrEntry {
                    exercise,
                    weight: convert_weight(weight, unit),
                    date,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", format!("Cycle {}", progress.current_cycle).cyan().bold());
    if progress.is_deload_week {
        println!("{}", "deload week in progress".cyan());
    }
    println!(
        "volume: {} across {} sets, {} exercises",
        format_volume(volume.total_volume, unit).bold(),
        volume.sets,
        volume.exercises
    );

    let confidence = match frequency.confidence {
        Confidence::Default => "program default",
        Confidence::Low => "low confidence",
        Confidence::High => "high confidence",
    };
    println!(
        "pace: {}/week ({})",
        frequency.workouts_per_week.to_string().bold(),
        confidence.dimmed()
    );

    if deload_due(&progress, today) && !progress.is_deload_week {
        println!("{} deload is due", "warning:".yellow().bold());
    }

    if !prs.is_empty() {
        println!("\n{}", "PRs this cycle:".cyan().bold());
        for (exercise, weight, date) in &prs {
            println!("  {} {} {}", "★".yellow().bold(), exercise.bold(), format!("{} ({})", format_weight(*weight, unit), date).dimmed());
        }
    }
    Ok(())
}

/// Every PR set logged in the current cycle: heaviest new weight per
/// exercise, with the date it happened.
fn prs_this_cycle(progress: &UserProgress) -> Vec<(String, f64, String)> {
    let mut best: BTreeMap<String, (f64, String)> = BTreeMap::new();

    for log in &progress.workout_logs {
        if log.cycle != progress.current_cycle || !log.completed {
            continue;
        }
        let previous = find_previous_workout(&progress.workout_logs, log.day_number, &log.id);
        for ex in &log.exercises {
            if ex.is_skipped() {
                continue;
            }
            for set in &ex.sets {
                if !is_set_pr(previous, &ex.exercise_name, set.weight, set.reps, set.completed) {
                    continue;
                }
                let weight = set.weight.unwrap_or(0.0);
                match best.get(&ex.exercise_name) {
                    Some((w, _)) if *w >= weight => {}
                    _ => {
                        best.insert(ex.exercise_name.clone(), (weight, log.date.clone()));
                    }
                }
            }
        }
    }

    best.into_iter().map(|(name, (w, date))| (name, w, date)).collect()
}

/// Horizontal bar chart of weekly training volume, sized to the terminal.
fn render_volume_graph(progress: &UserProgress, weeks: u32, unit: WeightUnit, today: chrono::NaiveDate) {
    let start_monday = monday_of(add_days(today, -(7 * (weeks as i64 - 1))));

    let mut weekly: BTreeMap<String, f64> = BTreeMap::new();
    let mut monday = start_monday;
    while monday <= today {
        weekly.insert(to_iso_string(monday), 0.0);
        monday = add_days(monday, 7);
    }

    for log in &progress.workout_logs {
        if !log.completed {
            continue;
        }
        let Some(date) = parse_iso_date(&log.date) else { continue };
        if date < start_monday {
            continue;
        }
        let key = to_iso_string(monday_of(date));
        let volume = log
            .total_volume
            .unwrap_or_else(|| crate::engine::calculate_workout_volume(log));
        *weekly.entry(key).or_insert(0.0) += volume;
    }

    let max = weekly.values().cloned().fold(0.0_f64, f64::max);
    if max == 0.0 {
        println!("{}", "(no training volume in this window)".dimmed());
        return;
    }

    let term_width = term_size::dimensions().map_or(80, |(w, _)| w);
    // "YYYY-MM-DD ", bar, " 12.3k lb"
    let bar_width = term_width.saturating_sub(24).max(10);

    println!("{}", format!("Weekly volume (last {} weeks)", weeks).cyan().bold());
    for (week, volume) in &weekly {
        let filled = ((volume / max) * bar_width as f64).round() as usize;
        // Pad before coloring so the escape codes don't skew the columns.
        let bar = format!("{:<width$}", "█".repeat(filled), width = bar_width);
        println!("{} {} {}", week.dimmed(), bar.green(), format_volume(*volume, unit));
    }
}
