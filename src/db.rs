use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::types::Config;

pub type DB = SqlitePool;

/// Single key-value table of JSON documents: "progress" for the main state
/// plus one "active-workout-N" entry per in-flight session.
const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

pub async fn open(path: &str) -> Result<DB> {
    let opts = SqliteConnectOptions::from_str(path)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;

    sqlx::query(SCHEMA).execute(&pool).await?;
    Ok(pool)
}

/// `db-path` from config wins; otherwise the platform data directory.
pub fn resolve_path(config: &Config) -> Result<String> {
    if let Some(path) = config.get("db-path") {
        return Ok(path.to_string());
    }

    let mut dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.push("sanctum");
    std::fs::create_dir_all(&dir)?;
    dir.push("sanctum.db");
    Ok(dir.to_string_lossy().into_owned())
}
