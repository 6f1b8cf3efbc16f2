// Style mapping for the TUI
//
// Render passes carry semantic tags; this is the only place that turns them
// into terminal colors. Monochrome drops every color but keeps bold and
// underline, so the author line and links still stand out.

use crate::render::StyleTag;
use ratatui::style::{Color, Modifier, Style};

/// Colors for timeline tags and the surrounding chrome
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    monochrome: bool,
}

impl Theme {
    pub fn new(monochrome: bool) -> Self {
        Self { monochrome }
    }

    fn fg(&self, color: Color) -> Style {
        if self.monochrome {
            Style::default()
        } else {
            Style::default().fg(color)
        }
    }

    /// Style for a timeline segment
    pub fn tag(&self, tag: StyleTag) -> Style {
        match tag {
            StyleTag::Default => Style::default(),
            StyleTag::Author => self.fg(Color::Green).add_modifier(Modifier::BOLD),
            StyleTag::DisplayName => self.fg(Color::Cyan),
            StyleTag::VisibilityBadge => self.fg(Color::Yellow).add_modifier(Modifier::BOLD),
            StyleTag::Timestamp => self.fg(Color::Blue),
            StyleTag::Link => Style::default().add_modifier(Modifier::UNDERLINED),
            StyleTag::AppName => self.fg(Color::Cyan),
            StyleTag::Banner => self.fg(Color::Yellow),
            StyleTag::Notice => self.fg(Color::Red),
        }
    }

    /// Rule between the compose box and the timeline
    pub fn separator(&self) -> Style {
        self.fg(Color::Cyan)
    }

    pub fn status_bar(&self) -> Style {
        if self.monochrome {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        }
    }

    pub fn status_warning(&self) -> Style {
        if self.monochrome {
            self.status_bar().add_modifier(Modifier::BOLD)
        } else {
            self.status_bar().fg(Color::Red)
        }
    }

    pub fn hint(&self) -> Style {
        Style::default().add_modifier(Modifier::DIM)
    }
}
