use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Color;
use serde::{Deserialize, Serialize};

/// Muscle categories used by the program table. The closed set drives
/// rest-timer durations and badge colors through exhaustive matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Legs,
    Abs,
}

impl Category {
    /// Rest-timer duration between sets, in seconds.
    pub fn rest_timer_secs(self) -> u32 {
        match self {
            Self::Chest | Self::Back | Self::Legs => 180,
            Self::Shoulders => 120,
            Self::Biceps | Self::Triceps | Self::Abs => 90,
        }
    }

    /// Terminal color for the category badge next to an exercise name.
    pub fn badge_color(self) -> Color {
        match self {
            Self::Chest => Color::Red,
            Self::Back => Color::Blue,
            Self::Shoulders => Color::Magenta,
            Self::Biceps => Color::Yellow,
            Self::Triceps => Color::BrightYellow,
            Self::Legs => Color::Green,
            Self::Abs => Color::Cyan,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Shoulders => "shoulders",
            Self::Biceps => "biceps",
            Self::Triceps => "triceps",
            Self::Legs => "legs",
            Self::Abs => "abs",
        };

        write!(f, "{}", s)
    }
}

/// Display unit for weights and volume. Logged data is always stored in
/// pounds; conversion happens at render time only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Lb,
    Kg,
}

impl WeightUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lb" | "lbs" => Some(Self::Lb),
            "kg" | "kgs" => Some(Self::Kg),
            _ => None,
        }
    }
}

impl Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lb => write!(f, "lb"),
            Self::Kg => write!(f, "kg"),
        }
    }
}

/// Keys recognized by `sanctum config`.
pub const CONFIG_KEYS: &[&str] = &["unit", "db-path"];

/// Flat key-value config persisted as TOML under the user config dir.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub map: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).with_context(|| format!("Invalid config file: {}", path.display()))
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write config: {}", path.display()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn unit(&self) -> WeightUnit {
        self.map
            .get("unit")
            .and_then(|v| WeightUnit::parse(v))
            .unwrap_or(WeightUnit::Lb)
    }
}

pub fn config_path() -> Result<std::path::PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("sanctum").join("config.toml"))
        .context("Could not determine config directory")
}
