// Render output contract
//
// A render pass is a flat list of drawing instructions for the terminal
// surface. The renderer never touches the terminal itself: it produces a
// `RenderPass`, the stream task ships it over a channel, and the terminal
// task replays it into the timeline view.
//
// The pass tracks its own cursor (row, column) while ops are appended so the
// renderer can right-align the timestamp and the application name against
// the width it was given. Wrapping is lazy: a character that does not fit on
// the current row moves to the next one, a row may be exactly `width` wide.

use crate::width::str_width;

/// Semantic style of a text segment, mapped to colors by the terminal surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleTag {
    #[default]
    Default,
    /// Account handle on the author line
    Author,
    /// Display name in parentheses after the handle
    DisplayName,
    /// Unlisted / private / direct marker
    VisibilityBadge,
    /// Right-aligned local timestamp
    Timestamp,
    /// Media attachment marker and URL
    Link,
    /// Posting application name
    AppName,
    /// "Reblog by" line above a reblogged status
    Banner,
    /// Notification header line
    Notice,
}

/// One drawing instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    /// Styled text without line breaks
    Text { text: String, style: StyleTag },
    /// Move to the start of the next row
    Newline,
    /// Move back this many columns, later text overwrites what was there
    EraseBack(usize),
    /// Audible alert
    Bell,
    /// Put the cursor back into the compose box. The terminal task parks
    /// the cursor there after every draw, so surfaces that redraw whole
    /// frames treat this as a no-op.
    RestoreFocus,
}

/// Cursor position reached by the ops of a pass, relative to its first row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderCursor {
    pub row: usize,
    pub col: usize,
}

impl RenderCursor {
    /// Advance over `text` with lazy wrapping at `width` columns
    pub fn advance(&mut self, text: &str, width: usize) {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let w = str_width(ch.encode_utf8(&mut buf));
            if width > 0 && self.col > 0 && self.col + w > width {
                self.row += 1;
                self.col = 0;
            }
            self.col += w;
        }
    }

    pub fn newline(&mut self) {
        self.row += 1;
        self.col = 0;
    }
}

/// Ordered instructions for one status, notification or timeline element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPass {
    ops: Vec<RenderOp>,
    cursor: RenderCursor,
    width: usize,
}

impl RenderPass {
    pub fn new(width: usize) -> Self {
        Self {
            ops: Vec::new(),
            cursor: RenderCursor::default(),
            width,
        }
    }

    /// Append styled text. Embedded `\n` become `Newline` ops.
    pub fn text(&mut self, text: &str, style: StyleTag) {
        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            self.push_text(first, style);
        }
        for line in lines {
            self.newline();
            self.push_text(line, style);
        }
    }

    fn push_text(&mut self, text: &str, style: StyleTag) {
        if text.is_empty() {
            return;
        }
        self.cursor.advance(text, self.width);
        self.ops.push(RenderOp::Text {
            text: text.to_string(),
            style,
        });
    }

    pub fn newline(&mut self) {
        self.cursor.newline();
        self.ops.push(RenderOp::Newline);
    }

    /// Unstyled spaces
    pub fn pad(&mut self, columns: usize) {
        if columns > 0 {
            self.push_text(&" ".repeat(columns), StyleTag::Default);
        }
    }

    pub fn erase_back(&mut self, columns: usize) {
        if columns == 0 {
            return;
        }
        self.cursor.col = self.cursor.col.saturating_sub(columns);
        self.ops.push(RenderOp::EraseBack(columns));
    }

    pub fn bell(&mut self) {
        self.ops.push(RenderOp::Bell);
    }

    pub fn restore_focus(&mut self) {
        self.ops.push(RenderOp::RestoreFocus);
    }

    /// Column the cursor has reached on its current row
    pub fn column(&self) -> usize {
        self.cursor.col
    }

    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    #[cfg(test)]
    pub fn cursor(&self) -> RenderCursor {
        self.cursor
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Text content with newlines and erasures applied, styles dropped
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for op in &self.ops {
            match op {
                RenderOp::Text { text, .. } => out.push_str(text),
                RenderOp::Newline => out.push('\n'),
                RenderOp::EraseBack(n) => {
                    let mut left = *n;
                    while left > 0 {
                        let Some(ch) = out.pop() else { break };
                        if ch == '\n' {
                            out.push(ch);
                            break;
                        }
                        let mut buf = [0u8; 4];
                        let w = str_width(ch.encode_utf8(&mut buf));
                        if w > left {
                            // The half of a wide character left standing shows as blank
                            out.push_str(&" ".repeat(w - left));
                            left = 0;
                        } else {
                            left -= w;
                        }
                    }
                }
                RenderOp::Bell | RenderOp::RestoreFocus => {}
            }
        }
        out
    }
}
