// Stream frame reassembly
//
// The streaming endpoint delivers newline-delimited frames:
//
// ```
// event: update
// data: {"id":"1", ...}
//
// :thump
// ```
//
// Chunks arrive at arbitrary boundaries (mid-line, mid-character), so bytes
// are accumulated until the buffer ends with a line terminator. A complete
// buffer starting with `:` is a keepalive and is dropped. Otherwise each line
// is classified: `event:` names the kind of the next payload and `data:`
// carries the JSON document. The two lines may arrive in the same frame or in
// separate ones; the pending kind survives across frames until a `data:` line
// consumes it.

use bytes::{Buf, BytesMut};
use serde_json::Value;

// ============================================================================
// Classified Events
// ============================================================================

/// Event kind named by an `event:` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Update,
    Notification,
    Other(String),
}

impl EventKind {
    fn parse(token: &str) -> Self {
        match token {
            "update" => Self::Update,
            "notification" => Self::Notification,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A classified stream event ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A new status on the timeline
    Status(Value),
    /// A notification (follow, favourite, reblog, mention, ...)
    Notification(Value),
    /// Any other kind (delete, status.update, filters_changed, ...)
    Unknown { kind: String },
}

// ============================================================================
// Reassembler
// ============================================================================

/// Accumulates stream chunks and emits classified events
#[derive(Debug, Default)]
pub struct FrameReassembler {
    buffer: BytesMut,
    pending: Option<EventKind>,
    keepalives: u64,
}

impl FrameReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk from the transport.
    ///
    /// Returns the events completed by this chunk, in arrival order. An
    /// incomplete frame stays buffered and yields nothing.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(chunk);

        match self.buffer.last() {
            None => return Vec::new(),
            Some(b'\n') => {}
            Some(_) => return Vec::new(),
        }

        let frame = self.buffer.split();

        if frame.first() == Some(&b':') {
            self.keepalives += 1;
            tracing::trace!("Stream keepalive #{}", self.keepalives);
            return Vec::new();
        }

        let mut events = Vec::new();
        let mut rest = frame.freeze();
        while rest.has_remaining() {
            let end = rest
                .iter()
                .position(|&b| b == b'\n')
                .map(|i| i + 1)
                .unwrap_or(rest.len());
            let line = rest.split_to(end);
            if let Some(event) = self.classify_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Number of keepalive frames discarded so far
    pub fn keepalives(&self) -> u64 {
        self.keepalives
    }

    /// True when a partial frame is waiting for more bytes
    #[cfg(test)]
    pub fn has_partial(&self) -> bool {
        !self.buffer.is_empty()
    }

    fn classify_line(&mut self, raw: &[u8]) -> Option<StreamEvent> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches(['\n', '\r']);

        if line.is_empty() || line.starts_with(':') {
            return None;
        }

        if let Some(kind) = line.strip_prefix("event:") {
            let kind = EventKind::parse(kind.trim());
            if let Some(stale) = self.pending.replace(kind) {
                tracing::debug!("Event {:?} had no data line", stale);
            }
            return None;
        }

        if let Some(payload) = line.strip_prefix("data:") {
            return self.dispatch(payload.trim());
        }

        tracing::debug!("Ignoring unrecognized stream line ({} bytes)", line.len());
        None
    }

    /// Pair a `data:` payload with the pending event kind, then clear it
    fn dispatch(&mut self, payload: &str) -> Option<StreamEvent> {
        let Some(kind) = self.pending.take() else {
            tracing::debug!("Data line without event kind dropped");
            return None;
        };

        let parse = |payload: &str| match serde_json::from_str::<Value>(payload) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::debug!("Malformed {:?} payload dropped: {}", kind, e);
                None
            }
        };

        match &kind {
            EventKind::Update => parse(payload).map(StreamEvent::Status),
            EventKind::Notification => parse(payload).map(StreamEvent::Notification),
            EventKind::Other(name) => Some(StreamEvent::Unknown { kind: name.clone() }),
        }
    }
}
