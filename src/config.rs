use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Weekday;
use serde::Deserialize;

use crate::error::{PlannerError, PlannerResult};
use crate::formats::default_formats;

pub const DB_ENV: &str = "CONTENT_CALENDAR_DB";
pub const HTTP_ADDR_ENV: &str = "CONTENT_CALENDAR_HTTP_ADDR";

/// Settings read from a TOML file, all optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// SQLite database file.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// First column of the month grid, e.g. "sunday" or "mon".
    #[serde(default = "default_week_start")]
    pub week_start: String,

    /// Formats seeded into a brand new database.
    #[serde(default = "default_formats")]
    pub default_formats: Vec<String>,

    /// Listen address for the HTTP API.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            week_start: default_week_start(),
            default_formats: default_formats(),
            http_addr: default_http_addr(),
        }
    }
}

fn default_database() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("content-calendar")
        .join("planner.db")
}

fn default_week_start() -> String {
    "sunday".to_string()
}

fn default_http_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl PlannerConfig {
    pub fn from_toml_str(contents: &str) -> PlannerResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|err| PlannerError::invalid(format!("invalid config: {err}")))?;
        config.week_start()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> PlannerResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load `path` when given, otherwise defaults; environment overrides
    /// are applied either way.
    pub fn load_or_default(path: Option<&Path>) -> PlannerResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(DB_ENV).filter(|v| !v.trim().is_empty()) {
            self.database = PathBuf::from(db);
        }
        if let Some(addr) = lookup(HTTP_ADDR_ENV).filter(|v| !v.trim().is_empty()) {
            self.http_addr = addr;
        }
    }

    pub fn week_start(&self) -> PlannerResult<Weekday> {
        Weekday::from_str(self.week_start.trim())
            .map_err(|_| PlannerError::invalid(format!("unknown week_start '{}'", self.week_start)))
    }
}
