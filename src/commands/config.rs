use std::path::PathBuf;

use crate::cli::ConfigCmd;
use anyhow::{Context, Result};
use apex::types::{CONFIG_KEYS, Config, OutputFmt, emit};
use colored::Colorize;
use itertools::Itertools;

pub fn config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("apex").join("config"))
        .context("Could not determine config directory")
}

/// Database location: the `db` key, else the platform data directory.
pub fn db_path(cfg: &Config) -> Result<PathBuf> {
    match cfg.get("db") {
        Some(p) => Ok(PathBuf::from(p)),
        None => dirs::data_dir()
            .map(|d| d.join("apex").join("apex.db"))
            .context("Could not determine data directory"),
    }
}

pub fn handle(cmd: ConfigCmd, fmt: OutputFmt) -> Result<()> {
    let config_path = config_path()?;
    let mut cfg = Config::load(&config_path)?;

    match cmd {
        ConfigCmd::List => {
            emit(fmt, &cfg.map, || {
                if cfg.map.is_empty() {
                    println!("{}", "(no config set)".dimmed());
                } else {
                    println!("{}", "Config:".cyan().bold());
                    for (k, v) in &cfg.map {
                        println!("  {} = {}", k.green(), v);
                    }
                }
            });
        }

        ConfigCmd::Get { key } => match cfg.get(&key) {
            Some(val) => emit(fmt, &val, || println!("{}", val)),
            None => eprintln!("{} key `{}` not found", "warning:".yellow().bold(), key),
        },

        ConfigCmd::Set { key, val } => {
            if !CONFIG_KEYS.contains(key.as_str()) {
                eprintln!(
                    "{} `{}` is not a known key (known: {})",
                    "warning:".yellow().bold(),
                    key,
                    CONFIG_KEYS.iter().join(", ")
                );
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
                eprintln!("{} key `{}` not found", "warning:".yellow().bold(), key);
            }
        }
    }

    Ok(())
}
