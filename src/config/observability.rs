//! Logging settings: the `[logging]` table of config.toml
//!
//! While the timeline is on screen, log output only lands in the in-memory
//! buffer behind the status bar. These settings pick the level and, when
//! asked, mirror the same events (stream keepalives, dropped frames, post
//! results, login steps) to JSON files for debugging a session afterwards.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Log Rotation
// ─────────────────────────────────────────────────────────────────────────────

/// When tracing-appender starts a new log file
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LogRotation {
    Hourly,
    /// One file per day; a client left streaming overnight splits cleanly
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    /// Case-insensitive; anything unrecognized falls back to daily
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Effective logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for the `nanotoot` target, used when RUST_LOG is unset
    pub level: String,
    /// Mirror events to rotating JSON files
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// File name stem, e.g. "nanotoot" -> "nanotoot.2024-01-15"
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: default_log_dir(),
            file_rotation: LogRotation::Daily,
            file_prefix: "nanotoot".to_string(),
        }
    }
}

/// ~/.local/state/nanotoot/logs, or ./logs when no home directory is known
fn default_log_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|p| p.join("nanotoot").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Expand a leading `~/` against `home`. Other paths pass through.
pub(crate) fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    match (raw.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

/// The `[logging]` table as written in config.toml
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Fill unset keys from the defaults
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();
        let home = dirs::home_dir();

        Self {
            level: file.level.unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file
                .file_dir
                .map(|dir| expand_home(&dir, home.as_deref()))
                .unwrap_or(defaults.file_dir),
            file_rotation: file
                .file_rotation
                .map(|s| LogRotation::from_str(&s))
                .unwrap_or(defaults.file_rotation),
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
        }
    }
}
