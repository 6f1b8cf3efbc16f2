// Startup module - banner and active toggles
//
// Printed once after login, before the TUI takes over the screen, and
// mirrored into the log buffer.

use crate::config::{Config, VERSION};
use crate::credentials::Credentials;

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// One display toggle and whether it is on
struct Toggle {
    name: &'static str,
    enabled: bool,
    description: &'static str,
}

fn toggles(config: &Config) -> [Toggle; 3] {
    let display = &config.display;
    [
        Toggle {
            name: "mono",
            enabled: display.monochrome,
            description: "Colors disabled",
        },
        Toggle {
            name: "unlock",
            enabled: display.show_sensitive,
            description: "Private and direct posts shown",
        },
        Toggle {
            name: "noemoji",
            enabled: !display.icons,
            description: "Plain-text markers",
        },
    ]
}

/// Print the startup banner
pub fn print_startup(config: &Config, creds: &Credentials) {
    use colors::*;

    println!();
    println!("  {BOLD}{CYAN}nanotoot{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}Mastodon in your terminal{RESET}");
    println!();

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!("  {DIM}Profile:{RESET} {}", config.profile);
    println!();

    for toggle in toggles(config) {
        let (icon, style) = if toggle.enabled {
            (format!("{GREEN}✓{RESET}"), "")
        } else {
            (format!("{DIM}○{RESET}"), DIM)
        };
        println!(
            "    {icon} {style}{:<10}{RESET} {DIM}{}{RESET}",
            toggle.name, toggle.description
        );
    }
    println!();

    println!(
        "  {MAGENTA}▸{RESET} Streaming {BOLD}{}{RESET} timeline from {BOLD}{}{RESET}",
        config.timeline.as_str(),
        creds.domain
    );
    println!();
}

/// Mirror the startup summary into the log buffer
pub fn log_startup(config: &Config, creds: &Credentials) {
    tracing::info!("nanotoot v{}", VERSION);
    for toggle in toggles(config).iter().filter(|t| t.enabled) {
        tracing::info!("  ✓ {} - {}", toggle.name, toggle.description);
    }
    tracing::info!(
        "▸ {} timeline on {} (profile '{}')",
        config.timeline.as_str(),
        creds.domain,
        config.profile
    );
}
