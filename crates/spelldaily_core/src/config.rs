//! Rotation job configuration.
//!
//! # Responsibility
//! - Load the TOML config (database path, logging, schedule).
//! - Resolve the database path across CLI, environment and file.
//!
//! # Invariants
//! - A loaded config always has a non-empty, validated schedule.
//! - Keys missing from the file fall back to `RotationConfig::default()`.

use crate::logging::{default_log_level, parse_level};
use crate::model::schedule::{default_schedule, ScheduleEntry, ScheduleError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable overriding the configured database path.
pub const DATABASE_ENV_VAR: &str = "SPELLDAILY_DB";

const DEFAULT_DATABASE_FILE: &str = "spelldaily.sqlite3";

/// Configuration loading/validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    InvalidLogLevel(String),
    EmptySchedule,
    InvalidSchedule {
        index: usize,
        source: ScheduleError,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::InvalidLogLevel(message) => write!(f, "invalid config: {message}"),
            Self::EmptySchedule => write!(f, "invalid config: schedule must not be empty"),
            Self::InvalidSchedule { index, source } => {
                write!(f, "invalid config: schedule[{index}]: {source}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidSchedule { source, .. } => Some(source),
            Self::InvalidLogLevel(_) | Self::EmptySchedule => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings for one rotation process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub database_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` derives one next to
    /// the database.
    pub log_dir: Option<PathBuf>,
    pub schedule: Vec<ScheduleEntry>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
            schedule: default_schedule(),
        }
    }
}

impl RotationConfig {
    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_level(&self.log_level).map_err(ConfigError::InvalidLogLevel)?;
        if self.schedule.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }
        for (index, entry) in self.schedule.iter().enumerate() {
            entry
                .validate()
                .map_err(|source| ConfigError::InvalidSchedule { index, source })?;
        }
        Ok(())
    }

    /// Picks the database path by priority: CLI argument, then the
    /// `env_var_name` environment variable, then the configured value.
    pub fn resolve_database_path(&self, cli_arg: Option<&Path>, env_var_name: &str) -> PathBuf {
        if let Some(path) = cli_arg {
            return path.to_path_buf();
        }
        if let Some(path) = std::env::var_os(env_var_name).filter(|value| !value.is_empty()) {
            return PathBuf::from(path);
        }
        self.database_path.clone()
    }
}
