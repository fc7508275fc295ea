use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use sqlx::SqlitePool;

use crate::cli::{DeloadCmd, PlanCmd};
use crate::dates::{parse_iso_date, to_iso_string};
use crate::engine::frequency::Confidence;
use crate::engine::projection::{build_calendar_projection, CalendarCell, CalendarCellType};
use crate::engine::{deload_due, CalendarProjection};
use crate::program;
use crate::storage;

pub async fn handle(cmd: PlanCmd, pool: &SqlitePool, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let mut progress = storage::load_progress(pool, today).await?;

    match cmd {
        PlanCmd::Show => {
            let projection = build_calendar_projection(&progress, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&projection)?);
            } else {
                render_calendar(&projection);
                if deload_due(&progress, today) && !progress.is_deload_week {
                    println!(
                        "\n{} deload is due — `sanctum plan deload start` when ready",
                        "warning:".yellow().bold()
                    );
                }
            }
        }

        PlanCmd::Rest { date } => {
            let date = match date {
                Some(raw) => match parse_iso_date(&raw) {
                    Some(d) => d,
                    None => {
                        println!("{} invalid date `{}` (expected YYYY-MM-DD)", "error:".red().bold(), raw);
                        return Ok(());
                    }
                },
                None => today,
            };
            let iso = to_iso_string(date);
            let was_rest = progress.rest_days.iter().any(|d| *d == iso);
            storage::toggle_rest_day(&mut progress, &iso);
            storage::save_progress(pool, &progress).await?;
            if was_rest {
                println!("{} `{}` is no longer a rest day", "info:".blue().bold(), iso);
            } else {
                println!("{} marked `{}` as a rest day", "ok:".green().bold(), iso);
            }
        }

        PlanCmd::Deload(cmd) => handle_deload(cmd, pool, &mut progress).await?,

        PlanCmd::Interval { weeks } => {
            if weeks == 0 {
                println!("{} interval must be at least 1 week", "error:".red().bold());
                return Ok(());
            }
            progress.deload_interval_weeks = weeks;
            storage::save_progress(pool, &progress).await?;
            println!("{} deload interval set to {} weeks", "ok:".green().bold(), weeks);
        }

        PlanCmd::Cycle { cycle } => {
            if cycle == 0 {
                println!("{} cycle numbers start at 1", "error:".red().bold());
                return Ok(());
            }
            progress.current_cycle = cycle;
            storage::save_progress(pool, &progress).await?;
            println!("{} current cycle set to {}", "ok:".green().bold(), cycle);
        }
    }

    Ok(())
}

async fn handle_deload(cmd: DeloadCmd, pool: &SqlitePool, progress: &mut crate::models::UserProgress) -> Result<()> {
    let today = Local::now().date_naive();

    match cmd {
        DeloadCmd::Start => {
            if progress.is_deload_week {
                println!("{} a deload is already active", "warning:".yellow().bold());
                return Ok(());
            }
            storage::start_deload(progress);
            storage::save_progress(pool, progress).await?;
            println!("{} deload started — run lighter this week", "ok:".green().bold());
        }

        DeloadCmd::End => {
            if !progress.is_deload_week {
                println!("{} no active deload to end", "warning:".yellow().bold());
                return Ok(());
            }
            storage::end_deload(progress, today);
            storage::save_progress(pool, progress).await?;
            println!("{} deload ended, interval clock restarted", "ok:".green().bold());
        }

        DeloadCmd::Skip => {
            storage::record_deload(progress, today);
            storage::save_progress(pool, progress).await?;
            println!("{} deload dismissed, next one rescheduled", "info:".blue().bold());
        }
    }

    Ok(())
}

/* ─────────────────────────── rendering ──────────────────────────────── */

const CELL_WIDTH: usize = 7;

fn render_calendar(projection: &CalendarProjection) {
    println!("{}", "Training Plan".cyan().bold());
    println!(
        "next: {} (cycle {})",
        projection.next_workout.day_name.bold(),
        projection.next_workout.cycle
    );

    let freq = &projection.frequency;
    let confidence = match freq.confidence {
        Confidence::Default => "program default".to_string(),
        Confidence::Low => "low confidence".to_string(),
        Confidence::High => "high confidence".to_string(),
    };
    println!(
        "pace: {}/week, about every {} days ({})\n",
        freq.workouts_per_week, freq.avg_days_between_workouts, confidence.dimmed()
    );

    let header: String =
        ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"].map(|d| format!("{:<width$}", d, width = CELL_WIDTH)).join("");
    println!("{:<14}{}", "", header.dimmed());

    for week in &projection.weeks {
        let label = if week.is_deload_week && !week.is_current_week {
            format!("{:<14}", week.week_label).cyan().bold().to_string()
        } else if week.is_current_week {
            format!("{:<14}", week.week_label).bold().to_string()
        } else {
            format!("{:<14}", week.week_label).dimmed().to_string()
        };

        let row: String = week.cells.iter().map(render_cell).collect();
        println!("{}{}", label, row);
    }
}

fn render_cell(cell: &CalendarCell) -> String {
    let day_of_month = parse_iso_date(&cell.date)
        .map(|d| chrono::Datelike::day(&d).to_string())
        .unwrap_or_default();

    let token = match cell.cell_type {
        CalendarCellType::PastCompleted => {
            let abbrev = cell.workout.as_ref().map_or_else(String::new, |w| program::day_abbrev(w.day_number));
            let text = pad(&format!("{} {}", day_of_month, abbrev));
            if cell.workout.as_ref().is_some_and(|w| w.is_deload) {
                text.cyan().to_string()
            } else {
                text.green().bold().to_string()
            }
        }
        CalendarCellType::Today => {
            let abbrev = cell.workout.as_ref().map_or_else(|| "—".to_string(), |w| program::day_abbrev(w.day_number));
            pad(&format!("{} {}", day_of_month, abbrev)).black().on_white().to_string()
        }
        CalendarCellType::Projected => {
            let abbrev = cell.workout.as_ref().map_or_else(String::new, |w| program::day_abbrev(w.day_number));
            pad(&format!("{} {}", day_of_month, abbrev)).blue().to_string()
        }
        CalendarCellType::Deload => pad(&format!("{} dld", day_of_month)).cyan().to_string(),
        CalendarCellType::ExplicitRest => pad(&format!("{} rest", day_of_month)).yellow().to_string(),
        CalendarCellType::PastMissed => pad(&format!("{} ·", day_of_month)).dimmed().to_string(),
        CalendarCellType::Rest => pad(&day_of_month).dimmed().to_string(),
    };

    token
}

// Pad before coloring; escape codes would break the column math.
fn pad(s: &str) -> String {
    format!("{:<width$}", s, width = CELL_WIDTH)
}
