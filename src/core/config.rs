//! Environment-driven configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! Call `dotenvy::dotenv()` before `Config::from_env()` so values from a local
//! `.env` file are visible.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Lead interval used when `REMINDER_LEAD_HOURS` is unset
pub const DEFAULT_LEAD_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Hours between a reminder firing and the assignment's due date
    pub reminder_lead_hours: i64,
    /// Populate the store with the built-in sample assignments
    pub seed_demo_data: bool,
    /// Optional YAML file of assignments loaded at start
    pub seed_file: Option<PathBuf>,
    /// Whether the in-memory notification backend grants permission on request
    pub notifications_granted: bool,
    /// Default `env_logger` filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reminder_lead_hours: DEFAULT_LEAD_HOURS,
            seed_demo_data: true,
            seed_file: None,
            notifications_granted: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let reminder_lead_hours = match lookup("REMINDER_LEAD_HOURS") {
            Some(raw) => {
                let hours: i64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("REMINDER_LEAD_HOURS is not an integer: {raw}"))?;
                if hours <= 0 {
                    anyhow::bail!("REMINDER_LEAD_HOURS must be positive, got {hours}");
                }
                hours
            }
            None => defaults.reminder_lead_hours,
        };

        let seed_demo_data = match lookup("SEED_DEMO_DATA") {
            Some(raw) => parse_flag("SEED_DEMO_DATA", &raw)?,
            None => defaults.seed_demo_data,
        };

        let notifications_granted = match lookup("NOTIFICATIONS_GRANTED") {
            Some(raw) => parse_flag("NOTIFICATIONS_GRANTED", &raw)?,
            None => defaults.notifications_granted,
        };

        let seed_file = lookup("SEED_FILE")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        let log_level = lookup("LOG_LEVEL")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.log_level);

        Ok(Config {
            reminder_lead_hours,
            seed_demo_data,
            seed_file,
            notifications_granted,
            log_level,
        })
    }

    /// Lead interval as a chrono duration
    pub fn reminder_lead(&self) -> chrono::Duration {
        chrono::Duration::hours(self.reminder_lead_hours)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("{key} must be a boolean, got '{other}'")),
    }
}
