//! `[logging]` section
//!
//! Values are checked when the file is loaded: an unknown level or rotation
//! fails `Config::load()` the same way a malformed env override does.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// How often the JSON log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

impl FromStr for LogRotation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "never" => Ok(Self::Never),
            other => bail!("unknown file_rotation {:?} (expected hourly, daily or never)", other),
        }
    }
}

/// Stderr and optional rolling-file logging
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default level for the `gridspy` target; RUST_LOG replaces it entirely
    pub level: String,
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// File name stem, e.g. "gridspy" -> "gridspy.2024-01-15"
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs/trace"),
            file_rotation: LogRotation::Daily,
            file_prefix: "gridspy".to_string(),
        }
    }
}

/// Logging settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

/// Normalize a level name, rejecting anything tracing cannot filter on
fn parse_level(raw: &str) -> Result<String> {
    let level = raw.trim().to_ascii_lowercase();
    LevelFilter::from_str(&level)
        .with_context(|| format!("unknown log level {:?} (expected off, error, warn, info, debug or trace)", raw))?;
    Ok(level)
}

impl LoggingConfig {
    /// Merge the file section over defaults, validating level and rotation
    pub fn from_file(file: Option<FileLogging>) -> Result<Self> {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let level = match file.level {
            Some(raw) => parse_level(&raw)?,
            None => defaults.level,
        };
        let file_rotation = match file.file_rotation {
            Some(raw) => raw.parse()?,
            None => defaults.file_rotation,
        };
        if file.file_prefix.as_deref().is_some_and(|p| p.trim().is_empty()) {
            bail!("logging.file_prefix must not be empty");
        }

        Ok(Self {
            level,
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file.file_dir.map(PathBuf::from).unwrap_or(defaults.file_dir),
            file_rotation,
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
        })
    }
}
