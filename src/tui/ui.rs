// Screen layout and drawing
//
//   ┌ compose box (5 rows) ──────────────┐
//   ├ ---------------------------------- ┤
//   │ timeline                           │
//   └ status bar (1 row) ────────────────┘
//
// The cursor always ends in the compose box, wherever the timeline was
// last written.

use super::app::{App, COMPOSE_HEIGHT};
use super::timeline::StyledLine;
use super::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const COMPOSE_HINT: &str = "Esc: post  /private /unlisted: visibility  PgUp/PgDn: scroll  Ctrl-C: quit";

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(COMPOSE_HEIGHT), // Compose box
            Constraint::Length(1),              // Separator
            Constraint::Min(1),                 // Timeline
            Constraint::Length(1),              // Status bar
        ])
        .split(f.area());

    draw_separator(f, chunks[1], &app.theme);
    draw_timeline(f, chunks[2], app);
    draw_status_bar(f, chunks[3], app);
    draw_compose(f, chunks[0], app);
}

fn draw_compose(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width as usize;

    if app.compose.is_empty() {
        let hint = Paragraph::new(Span::styled(COMPOSE_HINT, app.theme.hint()));
        f.render_widget(hint, area);
        f.set_cursor_position((area.x, area.y));
        return;
    }

    let lines = app.compose.lines(width);
    let (row, col) = app.compose.cursor_position(width);

    // Keep the cursor row on screen
    let height = area.height as usize;
    let first = (row + 1).saturating_sub(height);
    let visible: Vec<Line> = lines
        .into_iter()
        .skip(first)
        .take(height)
        .map(Line::from)
        .collect();

    f.render_widget(Paragraph::new(visible), area);
    f.set_cursor_position((
        area.x + col.min(width.saturating_sub(1)) as u16,
        area.y + (row - first) as u16,
    ));
}

fn draw_separator(f: &mut Frame, area: Rect, theme: &Theme) {
    let rule = "-".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(Span::styled(rule, theme.separator())),
        area,
    );
}

fn draw_timeline(f: &mut Frame, area: Rect, app: &mut App) {
    app.scroll
        .update_dimensions(app.timeline.len(), area.height as usize);
    let (start, end) = app.scroll.visible_range();

    let theme = app.theme;
    let lines: Vec<Line> = app
        .timeline
        .lines()
        .skip(start)
        .take(end - start)
        .map(|line| styled_line(line, &theme))
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

fn styled_line<'a>(line: &'a StyledLine, theme: &Theme) -> Line<'a> {
    Line::from(
        line.spans
            .iter()
            .map(|span| Span::styled(span.text.as_str(), theme.tag(span.style)))
            .collect::<Vec<_>>(),
    )
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let (text, warning) = status_text(app);
    let style = if warning {
        app.theme.status_warning()
    } else {
        app.theme.status_bar()
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}

/// Status line contents and whether it is showing a problem
pub fn status_text(app: &App) -> (String, bool) {
    let mut text = format!(
        " {} │ {} │ {}",
        app.scope.as_str(),
        app.connection.label(),
        app.account
    );

    if !app.scroll.auto_follow {
        text.push_str(" │ scrolled");
    }

    if let Some(notice) = &app.notice {
        text.push_str(" │ ");
        text.push_str(notice);
    }

    let mut warning = false;
    if let Some(entry) = app.log_buffer.latest_problem() {
        text.push_str(" │ ⚠ ");
        text.push_str(entry.level.as_str());
        text.push(' ');
        text.push_str(&entry.message);
        warning = true;
    }

    (text, warning)
}
