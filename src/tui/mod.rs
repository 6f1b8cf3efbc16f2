// TUI module - the terminal-owning task
//
// Everything that touches the terminal happens here: keyboard input,
// drawing, the bell. The stream task and post tasks talk to it through
// `UiMessage`s, so draws never interleave.

pub mod app;
pub mod scroll;
pub mod theme;
pub mod timeline;
pub mod ui;

use crate::api::MastodonClient;
use crate::config::Config;
use crate::compose::Toot;
use crate::logging::LogBuffer;
use crate::stream::{StreamCommand, UiMessage};
use anyhow::{anyhow, Context, Result};
use app::{Action, App};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::mpsc;

/// Channels between the terminal task and the rest of the client
pub struct Channels {
    /// Render passes, status updates and fatal errors
    pub ui_rx: mpsc::Receiver<UiMessage>,
    /// Handed to post tasks so they can report back
    pub ui_tx: mpsc::Sender<UiMessage>,
    /// Resize requests to the stream task
    pub cmd_tx: mpsc::Sender<StreamCommand>,
}

/// Run the TUI until the user quits or a fatal error arrives.
///
/// The terminal is restored before returning, so a fatal error can be
/// printed legibly by the caller.
pub async fn run_tui(
    mut channels: Channels,
    client: MastodonClient,
    config: Config,
    account: String,
    log_buffer: LogBuffer,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let width = terminal.size().map(|s| s.width).unwrap_or(80);
    let mut app = App::new(&config, account, width, log_buffer);

    let result = run_event_loop(&mut terminal, &mut app, &mut channels, &client).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result?;
    match app.fatal {
        Some(error) => Err(anyhow!(error)),
        None => Ok(()),
    }
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    channels: &mut Channels,
    client: &MastodonClient,
) -> Result<()> {
    let Channels {
        ui_rx,
        ui_tx,
        cmd_tx,
    } = channels;

    // Periodic redraw picks up new warnings in the log buffer
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        if std::mem::take(&mut app.bell) {
            ring_bell();
        }

        tokio::select! {
            // Keyboard input and resizes
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => {
                            match app.handle_key(key) {
                                Action::Submit(toot) => spawn_post(client, toot, ui_tx.clone()),
                                Action::Quit => app.should_quit = true,
                                Action::None => {}
                            }
                        }
                        Ok(Event::Resize(width, _)) => {
                            app.resize(width);
                            if cmd_tx.try_send(StreamCommand::Resize { width }).is_err() {
                                tracing::warn!("Stream task busy, resize to {} dropped", width);
                            }
                        }
                        _ => {}
                    }
                }
            } => {}

            _ = tick_interval.tick() => {}

            msg = ui_rx.recv() => match msg {
                Some(msg) => app.handle_message(msg),
                None => {
                    app.fatal = Some("Stream task stopped".to_string());
                    app.should_quit = true;
                }
            },
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Send a post in the background. A failed post is fatal, like a stream
/// failure.
fn spawn_post(client: &MastodonClient, toot: Toot, ui_tx: mpsc::Sender<UiMessage>) {
    let client = client.clone();
    tokio::spawn(async move {
        let msg = match client.post_status(&toot).await {
            Ok(_) => {
                tracing::info!("Posted {} status", toot.visibility.as_str());
                UiMessage::Notice("Posted".to_string())
            }
            Err(e) => {
                tracing::error!("Post failed: {:#}", e);
                UiMessage::Fatal(format!("{:#}", e))
            }
        };
        let _ = ui_tx.send(msg).await;
    });
}

fn ring_bell() {
    let mut out = io::stdout();
    let _ = out.write_all(b"\x07");
    let _ = out.flush();
}
