// CLI module - command-line flags and the config subcommand
//
// Without a subcommand the client starts. `nanotoot config` inspects or
// resets the config file and exits:
// - config --show: Display effective configuration
// - config --path: Show config file path
// - config --reset: Regenerate config file with defaults

use crate::config::{CliOverrides, Config, TimelineScope, VERSION};
use clap::{Parser, Subcommand};
use std::io::Write;

/// nanotoot - a small Mastodon client for the terminal
#[derive(Parser, Debug)]
#[command(name = "nanotoot")]
#[command(version = VERSION)]
#[command(about = "Streaming Mastodon timeline and composer for the terminal", long_about = None)]
pub struct Cli {
    /// Disable colors
    #[arg(long)]
    pub mono: bool,

    /// Show private and direct posts
    #[arg(long)]
    pub unlock: bool,

    /// Plain-text markers instead of emoji icons
    #[arg(long)]
    pub noemoji: bool,

    /// Credential profile to use
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Timeline to load and stream
    #[arg(long, value_enum)]
    pub timeline: Option<TimelineScope>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            monochrome: self.mono,
            show_sensitive: self.unlock,
            no_icons: self.noemoji,
            profile: self.profile.clone(),
            timeline: self.timeline,
        }
    }
}

/// Handle subcommands. Returns true if one ran (exit after).
pub fn handle_command(cli: &Cli) -> bool {
    match cli.command {
        Some(Commands::Config { show, reset, path }) => {
            if path {
                handle_config_path();
            } else if show {
                handle_config_show(cli);
            } else if reset {
                handle_config_reset();
            } else {
                println!("Usage: nanotoot config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
            }
            true
        }
        None => false,
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show(cli: &Cli) {
    let mut config = Config::from_env();
    config.apply_cli(&cli.overrides());

    println!("# Effective configuration (flags > env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}
