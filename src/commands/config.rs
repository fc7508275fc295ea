use anyhow::Result;
use colored::Colorize;
use strsim::jaro_winkler;

use crate::cli::ConfigCmd;
use crate::types::{config_path, Config, WeightUnit, CONFIG_KEYS};

fn suggest_key(key: &str) -> Option<&'static str> {
    CONFIG_KEYS
        .iter()
        .map(|k| (*k, jaro_winkler(key, k)))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(k, _)| k)
}

pub async fn handle(cmd: ConfigCmd) -> Result<()> {
    let config_path = config_path()?;
    let mut cfg = Config::load(&config_path)?;

    match cmd {
        ConfigCmd::List => {
            if cfg.map.is_empty() {
                println!("{}", "(no config set)".dimmed());
            } else {
                println!("{}", "Config:".cyan().bold());
                for (k, v) in &cfg.map {
                    println!("  {} = {}", k.green(), v);
                }
            }
        }

        ConfigCmd::Get { key } => match cfg.map.get(&key) {
            Some(val) => println!("{}", val),
            None => println!("{} key `{}` not found", "warning:".yellow().bold(), key),
        },

        ConfigCmd::Set { key, val } => {
            if !CONFIG_KEYS.contains(&key.as_str()) {
                match suggest_key(&key) {
                    Some(s) => println!(
                        "{} unknown key `{}` (did you mean `{}`?)",
                        "error:".red().bold(),
                        key,
                        s.green()
                    ),
                    None => println!("{} unknown key `{}`", "error:".red().bold(), key),
                }
                return Ok(());
            }
            if key == "unit" && WeightUnit::parse(&val).is_none() {
                println!("{} unit must be `lb` or `kg`", "error:".red().bold());
                return Ok(());
            }

            cfg.map.insert(key.clone(), val.clone());
            cfg.save(&config_path)?;
            println!("{} set `{}` = `{}`", "info:".blue().bold(), key.green(), val);
        }

        ConfigCmd::Unset { key } => {
            if cfg.map.remove(&key).is_some() {
                cfg.save(&config_path)?;
                println!("{} removed `{}`", "info:".blue().bold(), key.green());
            } else {
                println!("{} key `{}` not found", "warning:".yellow().bold(), key);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggests_close_key_names() {
        assert_eq!(suggest_key("unti"), Some("unit"));
        assert_eq!(suggest_key("db-pth"), Some("db-path"));
        assert_eq!(suggest_key("zzz"), None);
    }
}
