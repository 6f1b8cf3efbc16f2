// Timeline view - replays render passes into a scrollback of styled lines
//
// Lines are hard-wrapped at the view width with the same lazy rule the
// renderer uses to track its cursor, so right-aligned timestamps land where
// the renderer expects. The last line is the one being written to.

use crate::render::{RenderOp, RenderPass, StyleTag};
use crate::width::str_width;
use std::collections::VecDeque;

/// Oldest lines are dropped beyond this
const MAX_LINES: usize = 5000;

/// A run of text in one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: StyleTag,
}

/// One terminal row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<Span>,
    width: usize,
}

impl StyledLine {
    #[cfg(test)]
    pub fn width(&self) -> usize {
        self.width
    }

    fn push(&mut self, ch: char, w: usize, style: StyleTag) {
        match self.spans.last_mut() {
            Some(span) if span.style == style => span.text.push(ch),
            _ => self.spans.push(Span {
                text: ch.to_string(),
                style,
            }),
        }
        self.width += w;
    }

    /// Move back exactly `columns` columns. A wide character cut in half
    /// leaves its remaining half as a blank, as a terminal does when text
    /// overwrites one of its cells.
    fn erase_back(&mut self, columns: usize) {
        let mut left = columns;
        while left > 0 {
            let Some(span) = self.spans.last_mut() else {
                break;
            };
            if let Some(ch) = span.text.pop() {
                let w = char_width(ch);
                self.width = self.width.saturating_sub(w);
                if w > left {
                    let blank = w - left;
                    span.text.push_str(&" ".repeat(blank));
                    self.width += blank;
                    left = 0;
                } else {
                    left -= w;
                }
            }
            if span.text.is_empty() {
                self.spans.pop();
            }
        }
    }

    #[cfg(test)]
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// What a pass asked the surface to do besides drawing text
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub bell: bool,
}

/// Scrollback of rendered output
#[derive(Debug)]
pub struct TimelineView {
    lines: VecDeque<StyledLine>,
    width: usize,
}

impl TimelineView {
    pub fn new(width: usize) -> Self {
        let mut lines = VecDeque::new();
        lines.push_back(StyledLine::default());
        Self { lines, width }
    }

    #[cfg(test)]
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = &StyledLine> {
        self.lines.iter()
    }

    /// Drop everything and start over at a new width
    pub fn clear(&mut self, width: usize) {
        self.lines.clear();
        self.lines.push_back(StyledLine::default());
        self.width = width;
    }

    /// Apply one pass. Returns side effects and the number of old lines
    /// dropped to stay within the scrollback limit.
    pub fn apply(&mut self, pass: &RenderPass) -> (Applied, usize) {
        let mut applied = Applied::default();

        for op in pass.ops() {
            match op {
                RenderOp::Text { text, style } => self.write(text, *style),
                RenderOp::Newline => self.lines.push_back(StyledLine::default()),
                RenderOp::EraseBack(n) => self.current().erase_back(*n),
                RenderOp::Bell => applied.bell = true,
                // The draw loop parks the cursor in the compose box every frame
                RenderOp::RestoreFocus => {}
            }
        }

        let mut dropped = 0;
        while self.lines.len() > MAX_LINES {
            self.lines.pop_front();
            dropped += 1;
        }
        (applied, dropped)
    }

    fn write(&mut self, text: &str, style: StyleTag) {
        let width = self.width;
        for ch in text.chars() {
            let w = char_width(ch);
            let line = self.current();
            if width > 0 && line.width > 0 && line.width + w > width {
                self.lines.push_back(StyledLine::default());
            }
            self.current().push(ch, w, style);
        }
    }

    fn current(&mut self) -> &mut StyledLine {
        if self.lines.is_empty() {
            self.lines.push_back(StyledLine::default());
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }
}

fn char_width(ch: char) -> usize {
    let mut buf = [0u8; 4];
    str_width(ch.encode_utf8(&mut buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_lines(view: &TimelineView) -> Vec<String> {
        view.lines().map(StyledLine::plain).collect()
    }

    #[test]
    fn newlines_and_styles() {
        let mut pass = RenderPass::new(20);
        pass.text("bob", StyleTag::Author);
        pass.text(" (Bob)", StyleTag::DisplayName);
        pass.newline();
        pass.text("hi", StyleTag::Default);
        pass.newline();

        let mut view = TimelineView::new(20);
        view.apply(&pass);

        assert_eq!(plain_lines(&view), vec!["bob (Bob)", "hi", ""]);
        let first = view.lines().next().unwrap();
        assert_eq!(first.spans.len(), 2);
        assert_eq!(first.spans[0].style, StyleTag::Author);
    }

    #[test]
    fn wraps_at_width() {
        let mut pass = RenderPass::new(4);
        pass.text("abcdef日", StyleTag::Default);

        let mut view = TimelineView::new(4);
        view.apply(&pass);
        assert_eq!(plain_lines(&view), vec!["abcd", "ef日"]);
        assert_eq!(pass.cursor().row, 1);
        assert_eq!(pass.column(), view.lines().last().unwrap().width());
    }

    #[test]
    fn erase_back_matches_renderer_cursor() {
        let mut pass = RenderPass::new(80);
        pass.text("author 日本", StyleTag::Author);
        pass.erase_back(2);
        pass.text(" 12:00", StyleTag::Timestamp);

        let mut view = TimelineView::new(80);
        view.apply(&pass);
        assert_eq!(plain_lines(&view), vec![pass.plain_text()]);
        assert_eq!(view.lines().next().unwrap().width(), pass.column());
    }

    #[test]
    fn erase_back_splitting_wide_char_stays_in_step() {
        let mut pass = RenderPass::new(30);
        pass.text("abc (日本語日本語日本語日本語)", StyleTag::DisplayName);
        pass.erase_back(24);
        pass.text(" ", StyleTag::Default);
        pass.text("01/15/24(Mon) 09:30:05", StyleTag::Timestamp);

        let mut view = TimelineView::new(30);
        view.apply(&pass);
        let line = view.lines().next().unwrap();
        assert_eq!(line.plain(), "abc (  01/15/24(Mon) 09:30:05");
        assert_eq!(line.width(), pass.column());
        assert_eq!(line.width(), 29);
    }

    #[test]
    fn reports_bell_and_draws_nothing_for_focus() {
        let mut pass = RenderPass::new(80);
        pass.bell();
        pass.restore_focus();
        let mut view = TimelineView::new(80);
        let (applied, dropped) = view.apply(&pass);
        assert!(applied.bell);
        assert_eq!(dropped, 0);
        assert_eq!(plain_lines(&view), vec![""]);
    }

    #[test]
    fn scrollback_is_bounded() {
        let mut pass = RenderPass::new(80);
        for _ in 0..MAX_LINES + 10 {
            pass.newline();
        }
        let mut view = TimelineView::new(80);
        let (_, dropped) = view.apply(&pass);
        assert_eq!(view.len(), MAX_LINES);
        assert_eq!(dropped, 11);
    }

    #[test]
    fn clear_resets_width() {
        let mut view = TimelineView::new(80);
        let mut pass = RenderPass::new(80);
        pass.text("x", StyleTag::Default);
        view.apply(&pass);
        view.clear(40);
        assert_eq!(view.width(), 40);
        assert_eq!(plain_lines(&view), vec![""]);
    }
}
