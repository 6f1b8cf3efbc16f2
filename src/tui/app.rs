// TUI application state
//
// Owns the compose buffer, the timeline scrollback and the status line.
// Key handling is pure: it returns an `Action` and the event loop performs
// the side effects (posting, quitting).

use super::scroll::ScrollState;
use super::theme::Theme;
use super::timeline::TimelineView;
use crate::compose::{ComposeBuffer, Toot};
use crate::config::{Config, TimelineScope};
use crate::logging::LogBuffer;
use crate::stream::{ConnectionState, UiMessage};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Rows reserved for the compose box
pub const COMPOSE_HEIGHT: u16 = 5;

/// What the event loop should do after a key press
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Submit(Toot),
    Quit,
}

pub struct App {
    pub compose: ComposeBuffer,
    pub timeline: TimelineView,
    pub scroll: ScrollState,
    pub theme: Theme,
    pub scope: TimelineScope,

    /// "@user@server" once known, the server domain before that
    pub account: String,

    pub connection: ConnectionState,

    /// Short message for the status bar, replaced by the next one
    pub notice: Option<String>,

    pub log_buffer: LogBuffer,

    /// Set when a render pass asked for the bell, cleared once rung
    pub bell: bool,

    pub should_quit: bool,

    /// Unrecoverable error from the stream task or a post
    pub fatal: Option<String>,
}

impl App {
    pub fn new(config: &Config, account: String, width: u16, log_buffer: LogBuffer) -> Self {
        Self {
            compose: ComposeBuffer::new(),
            timeline: TimelineView::new(width as usize),
            scroll: ScrollState::new(),
            theme: Theme::new(config.display.monochrome),
            scope: config.timeline,
            account,
            connection: ConnectionState::Loading,
            notice: None,
            log_buffer,
            bell: false,
            should_quit: false,
            fatal: None,
        }
    }

    /// Handle a message from the stream task or a post task
    pub fn handle_message(&mut self, msg: UiMessage) {
        match msg {
            UiMessage::Render(pass) => {
                let (applied, dropped) = self.timeline.apply(&pass);
                self.scroll.shift_up(dropped);
                self.bell |= applied.bell;
            }
            UiMessage::Status(state) => self.connection = state,
            UiMessage::Notice(text) => self.notice = Some(text),
            UiMessage::Fatal(error) => {
                self.fatal = Some(error);
                self.should_quit = true;
            }
        }
    }

    /// The terminal changed width: the timeline is redrawn from scratch
    pub fn resize(&mut self, width: u16) {
        self.timeline.clear(width as usize);
        self.scroll.scroll_to_bottom();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('d') => Action::Quit,
                KeyCode::Char('a') => {
                    self.compose.home();
                    Action::None
                }
                KeyCode::Char('e') => {
                    self.compose.end();
                    Action::None
                }
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Esc => return self.submit(),
            KeyCode::Enter => self.compose.insert('\n'),
            KeyCode::Backspace => self.compose.backspace(),
            KeyCode::Delete => self.compose.delete(),
            KeyCode::Left => self.compose.left(),
            KeyCode::Right => self.compose.right(),
            KeyCode::Home => self.compose.home(),
            KeyCode::End => self.compose.end(),
            KeyCode::PageUp => self.scroll.page_up(),
            KeyCode::PageDown => self.scroll.page_down(),
            KeyCode::Char(ch) => self.compose.insert(ch),
            _ => {}
        }
        Action::None
    }

    fn submit(&mut self) -> Action {
        if self.compose.is_empty() {
            return Action::None;
        }

        match Toot::from_input(&self.compose.text()) {
            Some(toot) => {
                self.compose.take();
                self.notice = Some("Posting...".to_string());
                Action::Submit(toot)
            }
            None => {
                self.notice = Some("Nothing to post".to_string());
                Action::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderPass, StyleTag};
    use crate::visibility::Visibility;

    fn app() -> App {
        App::new(&Config::default(), "example.social".into(), 40, LogBuffer::new())
    }

    fn press(app: &mut App, code: KeyCode) -> Action {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    #[test]
    fn escape_submits_with_prefix_rules() {
        let mut app = app();
        type_str(&mut app, "/unlisted hello");
        let action = press(&mut app, KeyCode::Esc);
        assert_eq!(
            action,
            Action::Submit(Toot {
                status: "hello".into(),
                visibility: Visibility::Unlisted
            })
        );
        assert!(app.compose.is_empty());
    }

    #[test]
    fn escape_on_empty_buffer_does_nothing() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Esc), Action::None);

        type_str(&mut app, "/private");
        assert_eq!(press(&mut app, KeyCode::Esc), Action::None);
        assert_eq!(app.compose.text(), "/private");
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = app();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(key), Action::Quit);
    }

    #[test]
    fn enter_inserts_newline() {
        let mut app = app();
        type_str(&mut app, "a");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "b");
        assert_eq!(app.compose.text(), "a\nb");
    }

    #[test]
    fn render_message_updates_timeline_and_bell() {
        let mut app = app();
        let mut pass = RenderPass::new(40);
        pass.bell();
        pass.text("Follow from bob", StyleTag::Notice);
        pass.newline();
        app.handle_message(UiMessage::Render(pass));

        assert!(app.bell);
        assert_eq!(app.timeline.len(), 2);
    }

    #[test]
    fn fatal_message_quits() {
        let mut app = app();
        app.handle_message(UiMessage::Fatal("Stream closed by server".into()));
        assert!(app.should_quit);
        assert_eq!(app.fatal.as_deref(), Some("Stream closed by server"));
    }

    #[test]
    fn resize_clears_timeline() {
        let mut app = app();
        let mut pass = RenderPass::new(40);
        pass.text("x", StyleTag::Default);
        pass.newline();
        app.handle_message(UiMessage::Render(pass));
        app.resize(100);
        assert_eq!(app.timeline.len(), 1);
        assert_eq!(app.timeline.width(), 100);
    }
}
