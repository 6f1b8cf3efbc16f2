// nanotoot - Mastodon in your terminal
//
// Streams a timeline (home, local or public) into a scrolling pane and
// posts from a small compose box above it.
//
// Architecture:
// - Auth: interactive OAuth login, credentials saved per profile
// - Stream task: batch timeline, then the live stream, rendered into passes
// - TUI (ratatui): the only task that touches the terminal
// - Channels: mpsc connects the stream and post tasks to the TUI

mod api;
mod auth;
mod cli;
mod compose;
mod config;
mod credentials;
mod document;
mod logging;
mod render;
mod startup;
mod stream;
mod tui;
mod visibility;
mod width;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, LogRotation};
use credentials::{CredentialStore, Credentials};
use logging::{LogBuffer, TuiLogLayer};
use render::Renderer;
use stream::StreamTask;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("nanotoot: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = cli::Cli::parse();

    // Subcommands (config --show, --reset, --path) exit early
    if cli::handle_command(&cli) {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    config.apply_cli(&cli.overrides());

    let log_buffer = LogBuffer::new();
    let _file_guard = init_logging(&config, &log_buffer);

    let store = CredentialStore::new(
        Config::config_dir().context("Could not determine home directory")?,
    );
    let creds = auth::login(&store, &config.profile).await?;
    let client = api::MastodonClient::new(&creds.domain, creds.access_token.clone())?;
    let account = account_label(&client, &creds).await;

    startup::print_startup(&config, &creds);
    startup::log_startup(&config, &creds);

    // Bounded channels: if the TUI falls behind, the stream task waits
    let (ui_tx, ui_rx) = mpsc::channel(1000);
    let (cmd_tx, cmd_rx) = mpsc::channel(16);

    let width = crossterm::terminal::size().map(|(w, _)| w).unwrap_or(80);
    let renderer = Renderer::new(config.display, width as usize);
    let stream_task = StreamTask::new(
        client.clone(),
        config.timeline,
        renderer,
        ui_tx.clone(),
        cmd_rx,
    );
    let stream_handle = tokio::spawn(stream_task.run());

    let channels = tui::Channels {
        ui_rx,
        ui_tx,
        cmd_tx,
    };
    let result = tui::run_tui(channels, client, config, account, log_buffer).await;

    stream_handle.abort();
    result
}

/// Route tracing into the TUI log buffer, plus a rolling JSON file if enabled.
///
/// Precedence: RUST_LOG env var > config file > default "info". The returned
/// guard must live until exit so the file writer flushes.
fn init_logging(
    config: &Config,
    log_buffer: &LogBuffer,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_filter = format!("nanotoot={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let mut guard = None;
    let file_layer = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let logging = &config.logging;
                let appender = match logging.file_rotation {
                    LogRotation::Hourly => {
                        tracing_appender::rolling::hourly(&logging.file_dir, &logging.file_prefix)
                    }
                    LogRotation::Daily => {
                        tracing_appender::rolling::daily(&logging.file_dir, &logging.file_prefix)
                    }
                    LogRotation::Never => {
                        tracing_appender::rolling::never(&logging.file_dir, &logging.file_prefix)
                    }
                };
                let (non_blocking, file_guard) = tracing_appender::non_blocking(appender);
                guard = Some(file_guard);
                Some(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(TuiLogLayer::new(log_buffer.clone()))
        .with(file_layer)
        .init();

    guard
}

/// "@user@server" for the status bar, or just the server if the account
/// lookup fails
async fn account_label(client: &api::MastodonClient, creds: &Credentials) -> String {
    match client.verify_credentials().await {
        Ok(account) => match document::str_at(&account, "acct") {
            "" => creds.domain.clone(),
            acct => format!("@{}@{}", acct, creds.domain),
        },
        Err(e) => {
            tracing::warn!("Could not look up account: {:#}", e);
            creds.domain.clone()
        }
    }
}
