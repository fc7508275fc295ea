use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

mod cli;
mod commands;
mod dates;
mod db;
mod engine;
mod models;
mod program;
mod storage;
mod types;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = types::Config::load(&types::config_path()?)?;
    let db_path = db::resolve_path(&config)?;
    let pool = db::open(&db_path).await?;

    match cli.cmd {
        Commands::Plan(cmd) => commands::plan::handle(cmd, &pool, cli.json).await?,
        Commands::Workout(cmd) => commands::workout::handle(cmd, &pool, cli.json).await?,
        Commands::Status { graph, weeks } => {
            commands::status::handle(&pool, graph, weeks, cli.json).await?
        }
        Commands::Config(cmd) => commands::config::handle(cmd).await?,
        Commands::Data(cmd) => commands::data::handle(cmd, &pool).await?,
    }

    Ok(())
}
