//! Client configuration
//!
//! Configuration is loaded in order of precedence:
//! 1. Command-line flags (highest priority)
//! 2. Environment variables
//! 3. Config file (~/.config/nanotoot/config.toml)
//! 4. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod display;
mod observability;
mod serialization;

#[cfg(test)]
mod tests;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use display::{DisplayOptions, TimelineScope};
pub use observability::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Profile used when none is given
pub const DEFAULT_PROFILE: &str = "default";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Timeline to load and stream
    pub timeline: TimelineScope,

    /// Rendering toggles (monochrome, show sensitive, icons)
    pub display: DisplayOptions,

    /// Credential profile name
    pub profile: String,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeline: TimelineScope::default(),
            display: DisplayOptions::default(),
            profile: DEFAULT_PROFILE.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub timeline: Option<String>,
    pub monochrome: Option<bool>,
    pub show_sensitive: Option<bool>,
    pub no_icons: Option<bool>,
    pub profile: Option<String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

/// Overrides taken from the command line
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub monochrome: bool,
    pub show_sensitive: bool,
    pub no_icons: bool,
    pub profile: Option<String>,
    pub timeline: Option<TimelineScope>,
}

/// Read a boolean toggle from the environment ("1" or "true")
fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Configuration directory: ~/.config/nanotoot
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("nanotoot"))
    }

    /// Get the config file path: ~/.config/nanotoot/config.toml
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        // Create parent directory
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Silently fail - config is optional
            }
        }

        // Write config (ignore errors - config is optional)
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// Exits the process if the file exists but cannot be parsed: a broken
    /// config should fail fast with a clear error, not fall back to defaults
    /// while the user debugs the wrong thing.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::parse_file_config(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n  CONFIG ERROR - Failed to parse configuration file\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - Invalid boolean values (use true/false)");
                    eprintln!("    - Typos in section names\n");
                    eprintln!("  To reset, run `nanotoot config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n  CONFIG ERROR - Cannot read configuration file\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load configuration: file -> env vars -> defaults
    pub fn from_env() -> Self {
        Self::from_file_config(Self::load_file_config())
    }

    /// Merge a parsed file layer with environment variables and defaults
    pub(crate) fn from_file_config(file: FileConfig) -> Self {
        // Timeline: env > file > default
        let timeline = std::env::var("NANOTOOT_TIMELINE")
            .ok()
            .or(file.timeline)
            .and_then(|s| {
                let scope = TimelineScope::from_str(&s);
                if scope.is_none() {
                    eprintln!("Unknown timeline {:?}, using home", s);
                }
                scope
            })
            .unwrap_or_default();

        let defaults = DisplayOptions::default();
        let display = DisplayOptions {
            monochrome: env_flag("NANOTOOT_MONO")
                .or(file.monochrome)
                .unwrap_or(defaults.monochrome),
            show_sensitive: env_flag("NANOTOOT_UNLOCK")
                .or(file.show_sensitive)
                .unwrap_or(defaults.show_sensitive),
            icons: !env_flag("NANOTOOT_NO_ICONS")
                .or(file.no_icons)
                .unwrap_or(!defaults.icons),
        };

        let profile = std::env::var("NANOTOOT_PROFILE")
            .ok()
            .or(file.profile)
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

        let logging = LoggingConfig::from_file(file.logging);

        Self {
            timeline,
            display,
            profile,
            logging,
        }
    }

    /// Apply command-line flags on top of everything else
    pub fn apply_cli(&mut self, cli: &CliOverrides) {
        if cli.monochrome {
            self.display.monochrome = true;
        }
        if cli.show_sensitive {
            self.display.show_sensitive = true;
        }
        if cli.no_icons {
            self.display.icons = false;
        }
        if let Some(profile) = &cli.profile {
            self.profile = profile.clone();
        }
        if let Some(timeline) = cli.timeline {
            self.timeline = timeline;
        }
    }
}
