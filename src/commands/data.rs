use std::io::Write;

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use sqlx::SqlitePool;

use crate::cli::DataCmd;
use crate::dates::to_iso_string;
use crate::storage;

pub async fn handle(cmd: DataCmd, pool: &SqlitePool) -> Result<()> {
    let today = Local::now().date_naive();

    match cmd {
        DataCmd::Export { file } => {
            let json = storage::export_data(pool, today).await?;
            let path =
                file.unwrap_or_else(|| format!("sanctum-backup-{}.json", to_iso_string(today)));
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write backup to {}", path))?;
            println!("{} exported progress to `{}`", "ok:".green().bold(), path);
        }

        DataCmd::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Could not read `{}`", file))?;
            match storage::import_data(pool, &raw).await {
                Ok(progress) => println!(
                    "{} imported {} workout logs (cycle {})",
                    "ok:".green().bold(),
                    progress.workout_logs.len(),
                    progress.current_cycle
                ),
                Err(e) => println!("{} {}", "error:".red().bold(), e),
            }
        }

        DataCmd::Reset { yes } => {
            if !yes {
                print!(
                    "{} this wipes all logs, settings, and active sessions. Type `yes` to continue: ",
                    "warning:".yellow().bold()
                );
                std::io::stdout().flush()?;
                let mut answer = String::new();
                std::io::stdin().read_line(&mut answer)?;
                if answer.trim() != "yes" {
                    println!("{} reset aborted", "info:".blue().bold());
                    return Ok(());
                }
            }
            storage::reset_all(pool).await?;
            println!("{} progress reset", "ok:".green().bold());
        }
    }

    Ok(())
}
