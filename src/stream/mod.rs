// Stream module - the task that owns the streaming connection
//
// One task loads the batch timeline, opens the live stream and then reads it
// for the life of the process. Every chunk goes through the reassembler and
// the renderer on this task; finished render passes are sent to the terminal
// task, which is the only thing that draws.
//
// Any transport failure (connect, non-success status, read error, server
// closing the stream) is fatal: it is reported as `UiMessage::Fatal` and the
// task ends. There is no reconnect.

pub mod frame;

use crate::api::MastodonClient;
use crate::config::TimelineScope;
use crate::render::{RenderPass, Renderer};
use anyhow::{Context, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;

pub use frame::{FrameReassembler, StreamEvent};

/// Connection progress shown in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Fetching the batch timeline
    Loading,
    /// Reading the live stream
    Live,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Live => "live",
        }
    }
}

/// Messages to the terminal task
#[derive(Debug)]
pub enum UiMessage {
    /// Draw one status or notification
    Render(RenderPass),
    Status(ConnectionState),
    /// A short note for the status bar (e.g. "Posted")
    Notice(String),
    /// Unrecoverable error, the terminal task should shut down
    Fatal(String),
}

/// Requests from the terminal task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCommand {
    /// The terminal was resized: re-render the batch timeline at this width
    Resize { width: u16 },
}

/// Owns the streaming connection and the renderer
pub struct StreamTask {
    client: MastodonClient,
    scope: TimelineScope,
    renderer: Renderer,
    reassembler: FrameReassembler,
    ui_tx: mpsc::Sender<UiMessage>,
    cmd_rx: mpsc::Receiver<StreamCommand>,
}

impl StreamTask {
    pub fn new(
        client: MastodonClient,
        scope: TimelineScope,
        renderer: Renderer,
        ui_tx: mpsc::Sender<UiMessage>,
        cmd_rx: mpsc::Receiver<StreamCommand>,
    ) -> Self {
        Self {
            client,
            scope,
            renderer,
            reassembler: FrameReassembler::new(),
            ui_tx,
            cmd_rx,
        }
    }

    /// Run until the connection fails or the terminal task goes away
    pub async fn run(mut self) {
        if let Err(e) = self.connect_and_pump().await {
            tracing::error!("Stream task failed: {:#}", e);
            let _ = self.ui_tx.send(UiMessage::Fatal(format!("{:#}", e))).await;
        }
        tracing::debug!(
            "Stream task finished ({} keepalives)",
            self.reassembler.keepalives()
        );
    }

    async fn connect_and_pump(&mut self) -> Result<()> {
        self.reload().await?;

        let stream = self.client.stream(self.scope).await?;
        let _ = self.ui_tx.send(UiMessage::Status(ConnectionState::Live)).await;
        tracing::info!("Streaming {} timeline", self.scope.as_str());

        self.pump(stream).await
    }

    /// Fetch and render the batch timeline
    async fn reload(&mut self) -> Result<()> {
        let _ = self.ui_tx.send(UiMessage::Status(ConnectionState::Loading)).await;
        let doc = self.client.timeline(self.scope).await?;
        self.render_timeline(&doc).await;
        Ok(())
    }

    /// Send every element of a batch timeline, oldest first.
    /// Returns false if the terminal task is gone.
    async fn render_timeline(&self, doc: &Value) -> bool {
        let passes = self.renderer.timeline(doc);
        tracing::debug!("Rendering {} timeline entries", passes.len());

        for pass in passes {
            if self.ui_tx.send(UiMessage::Render(pass)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Read the stream until it ends.
    ///
    /// Returns `Ok` only when the terminal task has gone away; the stream
    /// ending or failing is an error.
    async fn pump<S, E>(&mut self, stream: S) -> Result<()>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        futures::pin_mut!(stream);

        loop {
            tokio::select! {
                chunk = stream.next() => match chunk {
                    Some(Ok(bytes)) => {
                        if !self.handle_chunk(&bytes).await {
                            return Ok(());
                        }
                    }
                    Some(Err(e)) => return Err(e).context("Stream read failed"),
                    None => anyhow::bail!("Stream closed by server"),
                },
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(StreamCommand::Resize { width }) => {
                        tracing::debug!("Re-rendering timeline at width {}", width);
                        self.renderer.set_width(width as usize);
                        self.reload().await?;
                        let _ = self.ui_tx.send(UiMessage::Status(ConnectionState::Live)).await;
                    }
                    None => return Ok(()),
                },
            }
        }
    }

    /// Feed one chunk and forward whatever it completes.
    /// Returns false if the terminal task is gone.
    async fn handle_chunk(&mut self, bytes: &[u8]) -> bool {
        for event in self.reassembler.feed(bytes) {
            let Some(pass) = self.renderer.dispatch(&event) else {
                continue;
            };
            if self.ui_tx.send(UiMessage::Render(pass)).await.is_err() {
                return false;
            }
        }
        true
    }
}
