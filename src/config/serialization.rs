//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the effective configuration as a commented config file
    pub fn to_toml(&self) -> String {
        let display = &self.display;
        let logging = &self.logging;

        format!(
            r#"# nanotoot configuration
# Command-line flags override these values.

# Timeline to load and stream: "home", "local" or "public" (--timeline)
timeline = "{timeline}"

# Credential profile under ~/.config/nanotoot/profiles/ (--profile)
profile = "{profile}"

# Disable colors (--mono)
monochrome = {monochrome}

# Show private and direct posts (--unlock)
show_sensitive = {show_sensitive}

# Plain-text markers instead of emoji icons (--noemoji)
no_icons = {no_icons}

[logging]
# Log level: trace, debug, info, warn, error (RUST_LOG overrides)
level = "{level}"
# Also write JSON logs to rotating files
file_enabled = {file_enabled}
file_dir = {file_dir:?}
# Rotation: "hourly", "daily" or "never"
file_rotation = "{file_rotation}"
file_prefix = "{file_prefix}"
"#,
            timeline = self.timeline.as_str(),
            profile = self.profile,
            monochrome = display.monochrome,
            show_sensitive = display.show_sensitive,
            no_icons = !display.icons,
            level = logging.level,
            file_enabled = logging.file_enabled,
            file_dir = logging.file_dir.display().to_string(),
            file_rotation = logging.file_rotation.as_str(),
            file_prefix = logging.file_prefix,
        )
    }
}
