// Scroll state for the timeline
//
// Auto-follow keeps the view pinned to the newest line while output
// streams in. Paging up releases it; paging back to the bottom re-enables it.

/// Scroll position over a list of lines
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Index of the first visible line
    offset: usize,

    /// Total number of lines
    total: usize,

    /// Number of lines visible
    viewport: usize,

    /// Whether new content keeps the view at the bottom
    pub auto_follow: bool,
}

impl ScrollState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            total: 0,
            viewport: 0,
            auto_follow: true,
        }
    }

    /// Update content and viewport sizes. Call each frame.
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;

        if self.auto_follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    /// Keep the same lines in view after `removed` lines were dropped from the top
    pub fn shift_up(&mut self, removed: usize) {
        if !self.auto_follow {
            self.offset = self.offset.saturating_sub(removed);
        }
    }

    pub fn page_up(&mut self) {
        let page = self.viewport.max(1);
        self.offset = self.offset.saturating_sub(page);
        self.auto_follow = self.offset >= self.max_offset();
    }

    pub fn page_down(&mut self) {
        let page = self.viewport.max(1);
        self.offset = (self.offset + page).min(self.max_offset());

        if self.offset >= self.max_offset() {
            self.auto_follow = true;
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.auto_follow = true;
    }

    /// Visible range (start, end)
    pub fn visible_range(&self) -> (usize, usize) {
        let start = self.offset;
        let end = (self.offset + self.viewport).min(self.total);
        (start, end)
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}
