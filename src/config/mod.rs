//! Configuration for the telemetry layer
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/gridspy/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod logging;
mod serialization;
mod telemetry;

#[cfg(test)]
mod tests;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use logging::{FileLogging, LogRotation, LoggingConfig};
pub use telemetry::{AggregationConfig, FileAggregation, FileTelemetry, TelemetryConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides `[telemetry] buffer_capacity`
pub const ENV_BUFFER_CAPACITY: &str = "GRIDSPY_BUFFER_CAPACITY";

/// Overrides `[telemetry] scroll_debounce_ms`
pub const ENV_SCROLL_DEBOUNCE_MS: &str = "GRIDSPY_SCROLL_DEBOUNCE_MS";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Event buffer, debounce and diagnostic trace settings
    pub telemetry: TelemetryConfig,

    /// Row fields used for aggregates
    pub aggregation: AggregationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    /// Optional [telemetry] section
    pub telemetry: Option<FileTelemetry>,

    /// Optional [aggregation] section
    pub aggregation: Option<FileAggregation>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/gridspy/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("gridspy").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    ///
    /// Returns the path when a new file was written.
    pub fn ensure_config_exists() -> Result<Option<PathBuf>> {
        let Some(path) = Self::config_path() else {
            return Ok(None);
        };

        if path.exists() {
            return Ok(None);
        }

        Self::write_default(&path)?;
        Ok(Some(path))
    }

    /// Overwrite `path` with the default template
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {}", parent.display()))?;
        }

        std::fs::write(path, Self::default().to_toml())
            .with_context(|| format!("writing config file {}", path.display()))
    }

    /// Read and parse a config file; a missing file yields empty sections
    fn load_file_config(path: &Path) -> Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("parsing config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => {
                Err(e).with_context(|| format!("reading config file {}", path.display()))
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn load() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::load_file_config(&path)?,
            None => FileConfig::default(),
        };
        Self::from_layers(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with environment overrides
    pub(crate) fn from_layers(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut telemetry = TelemetryConfig::from_file(file.telemetry);
        let aggregation = AggregationConfig::from_file(file.aggregation);
        let logging = LoggingConfig::from_file(file.logging).context("invalid [logging] section")?;

        // Buffer capacity: env > file > default
        if let Some(raw) = env(ENV_BUFFER_CAPACITY) {
            telemetry.buffer_capacity = parse_env(ENV_BUFFER_CAPACITY, &raw)?;
        }

        // Scroll debounce: env > file > default
        if let Some(raw) = env(ENV_SCROLL_DEBOUNCE_MS) {
            telemetry.scroll_debounce_ms = parse_env(ENV_SCROLL_DEBOUNCE_MS, &raw)?;
        }

        Ok(Self {
            telemetry,
            aggregation,
            logging,
        })
    }
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, raw))
}
