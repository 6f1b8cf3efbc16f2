// Compose - the post editor and the command prefixes applied on submit
//
// Toot commands (leading text of the buffer):
//   /private <text>    followers-only post
//   /unlisted <text>   unlisted post
//   //text             posts "/text" (escape for a leading slash)
//   anything else      public post

use crate::visibility::Visibility;
use serde::Serialize;
use unicode_width::UnicodeWidthChar;

/// A post ready to send, serialized as the `status`/`visibility` form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toot {
    pub status: String,
    pub visibility: Visibility,
}

impl Toot {
    /// Apply command prefixes to the editor contents.
    /// Returns `None` when there is nothing to post.
    pub fn from_input(input: &str) -> Option<Self> {
        let (visibility, body) = if let Some(rest) = input.strip_prefix("//") {
            (Visibility::Public, format!("/{}", rest))
        } else if let Some(rest) = strip_command(input, "/private") {
            (Visibility::Private, rest.to_string())
        } else if let Some(rest) = strip_command(input, "/unlisted") {
            (Visibility::Unlisted, rest.to_string())
        } else {
            (Visibility::Public, input.to_string())
        };

        if body.trim().is_empty() {
            return None;
        }

        Some(Self {
            status: body,
            visibility,
        })
    }
}

/// Strip `command` plus one following space or newline
fn strip_command<'a>(input: &'a str, command: &str) -> Option<&'a str> {
    let rest = input.strip_prefix(command)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(' ') | Some('\n') => Some(&rest[1..]),
        // "/privateer" is not a command
        Some(_) => None,
    }
}

// ============================================================================
// Editor Buffer
// ============================================================================

/// Editable text with a cursor, measured in chars
#[derive(Debug, Clone, Default)]
pub struct ComposeBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl ComposeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn insert(&mut self, ch: char) {
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    /// Start of the current line
    pub fn home(&mut self) {
        while self.cursor > 0 && self.chars[self.cursor - 1] != '\n' {
            self.cursor -= 1;
        }
    }

    /// End of the current line
    pub fn end(&mut self) {
        while self.cursor < self.chars.len() && self.chars[self.cursor] != '\n' {
            self.cursor += 1;
        }
    }

    /// Take the contents, leaving the buffer empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.chars).into_iter().collect()
    }

    /// Visual lines when wrapped at `width` columns
    pub fn lines(&self, width: usize) -> Vec<String> {
        let mut lines = vec![String::new()];
        let mut col = 0;
        for &ch in &self.chars {
            if ch == '\n' {
                lines.push(String::new());
                col = 0;
                continue;
            }
            let w = ch.width().unwrap_or(0);
            if width > 0 && col + w > width {
                lines.push(String::new());
                col = 0;
            }
            if let Some(line) = lines.last_mut() {
                line.push(ch);
            }
            col += w;
        }
        lines
    }

    /// Cursor position (row, column) when wrapped at `width` columns
    pub fn cursor_position(&self, width: usize) -> (usize, usize) {
        let (mut row, mut col) = (0, 0);
        for &ch in &self.chars[..self.cursor] {
            if ch == '\n' {
                row += 1;
                col = 0;
                continue;
            }
            let w = ch.width().unwrap_or(0);
            if width > 0 && col + w > width {
                row += 1;
                col = 0;
            }
            col += w;
        }
        // A full row pushes the cursor to the next one
        if width > 0 && col >= width {
            row += 1;
            col = 0;
        }
        (row, col)
    }
}
