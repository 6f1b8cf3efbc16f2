//! Configuration tests
//!
//! The template written on first run must parse back into the same values,
//! and every layer (file, CLI) must land in the right field.

use super::*;

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

/// Verify that serialized config can be parsed back.
#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed = Config::parse_file_config(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
}

#[test]
fn test_config_roundtrip_preserves_values() {
    let mut config = Config::default();
    config.timeline = TimelineScope::Local;
    config.profile = "work".to_string();
    config.display.monochrome = true;
    config.display.show_sensitive = true;
    config.display.icons = false;
    config.logging.level = "debug".to_string();
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;

    let file = Config::parse_file_config(&config.to_toml()).expect("template parses");

    assert_eq!(file.timeline.as_deref(), Some("local"));
    assert_eq!(file.profile.as_deref(), Some("work"));
    assert_eq!(file.monochrome, Some(true));
    assert_eq!(file.show_sensitive, Some(true));
    assert_eq!(file.no_icons, Some(true));

    let logging = LoggingConfig::from_file(file.logging);
    assert_eq!(logging.level, "debug");
    assert!(logging.file_enabled);
    assert_eq!(logging.file_rotation, LogRotation::Hourly);
}

// ─────────────────────────────────────────────────────────────────────────────
// Layering tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_gives_defaults() {
    let file = Config::parse_file_config("").unwrap();
    assert!(file.timeline.is_none());
    assert!(file.logging.is_none());

    let logging = LoggingConfig::from_file(file.logging);
    assert_eq!(logging.level, "info");
    assert!(!logging.file_enabled);
    assert_eq!(logging.file_rotation, LogRotation::Daily);
}

#[test]
fn test_partial_logging_section() {
    let file = Config::parse_file_config("[logging]\nfile_rotation = \"NEVER\"\n").unwrap();
    let logging = LoggingConfig::from_file(file.logging);
    assert_eq!(logging.file_rotation, LogRotation::Never);
    assert_eq!(logging.file_prefix, "nanotoot");
}

#[test]
fn test_log_dir_expands_home() {
    let home = std::path::Path::new("/home/alice");
    assert_eq!(
        observability::expand_home("~/logs/nanotoot", Some(home)),
        PathBuf::from("/home/alice/logs/nanotoot")
    );
    assert_eq!(
        observability::expand_home("/var/log/nanotoot", Some(home)),
        PathBuf::from("/var/log/nanotoot")
    );
    assert_eq!(
        observability::expand_home("~/logs", None),
        PathBuf::from("~/logs")
    );
}

#[test]
fn test_invalid_toml_is_an_error() {
    assert!(Config::parse_file_config("monochrome = maybe").is_err());
    assert!(Config::parse_file_config("[logging\nlevel = 1").is_err());
}

#[test]
fn test_cli_overrides_win() {
    let mut config = Config::default();
    config.apply_cli(&CliOverrides {
        monochrome: true,
        show_sensitive: true,
        no_icons: true,
        profile: Some("alt".to_string()),
        timeline: Some(TimelineScope::Public),
    });

    assert!(config.display.monochrome);
    assert!(config.display.show_sensitive);
    assert!(!config.display.icons);
    assert_eq!(config.profile, "alt");
    assert_eq!(config.timeline, TimelineScope::Public);
}

#[test]
fn test_absent_cli_flags_keep_file_values() {
    let mut config = Config::default();
    config.display.show_sensitive = true;
    config.timeline = TimelineScope::Local;
    config.apply_cli(&CliOverrides::default());

    assert!(config.display.show_sensitive);
    assert!(config.display.icons);
    assert_eq!(config.timeline, TimelineScope::Local);
    assert_eq!(config.profile, DEFAULT_PROFILE);
}
