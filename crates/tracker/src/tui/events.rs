//! Analyzer key handling
//!
//! Polls crossterm for input and maps keys onto [`App`] state changes.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use super::app::{App, AppAction, InputMode};

/// Event handler for TUI input
pub struct EventHandler {
    /// Tick rate for polling events
    tick_rate: Duration,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }

    /// Poll for next event
    ///
    /// Returns Some(Event) if an event occurred, None if tick timeout elapsed.
    pub fn poll(&self) -> Result<Option<Event>> {
        if event::poll(self.tick_rate)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Handle a key event and return the resulting action
    pub fn handle_key(&self, app: &mut App, key: KeyEvent) -> AppAction {
        // Ignore key release events on some platforms
        if key.kind != KeyEventKind::Press {
            return AppAction::None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            app.should_quit = true;
            return AppAction::Quit;
        }

        match app.input_mode {
            InputMode::Normal => self.handle_normal_mode(app, key),
            InputMode::Keyword => self.handle_keyword_mode(app, key),
        }
    }

    fn handle_normal_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => {
                app.should_quit = true;
                AppAction::Quit
            }

            // Navigation
            KeyCode::Up | KeyCode::Char('k') => {
                app.navigate_up();
                AppAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.navigate_down();
                AppAction::None
            }
            KeyCode::Enter => app.handle_enter(),

            // Actions
            KeyCode::Char('a') => app.handle_analyze(),
            KeyCode::Char('/') | KeyCode::Tab => {
                app.start_keyword_edit();
                AppAction::None
            }
            KeyCode::Char('*') => app.toggle_show_all(),
            KeyCode::Char('r') => app.handle_refresh(),

            _ => AppAction::None,
        }
    }

    fn handle_keyword_mode(&self, app: &mut App, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc | KeyCode::Tab => {
                app.cancel_input();
                AppAction::None
            }
            KeyCode::Enter => app.confirm_filter(),
            KeyCode::Backspace => {
                app.handle_keyword_backspace();
                AppAction::None
            }
            KeyCode::Char(c) => {
                app.handle_keyword_input(c);
                AppAction::None
            }
            _ => AppAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::PickerEntry;
    use std::path::PathBuf;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let mut app = App::new("/logs");
        app.set_entries(vec![
            PickerEntry::Parent(PathBuf::from("/")),
            PickerEntry::File(PathBuf::from("/logs/a.log")),
            PickerEntry::File(PathBuf::from("/logs/b.log")),
        ]);
        app
    }

    #[test]
    fn test_quit_keys() {
        let handler = EventHandler::new();
        let mut app = app();
        assert_eq!(handler.handle_key(&mut app, key(KeyCode::Char('q'))), AppAction::Quit);
        assert!(app.should_quit);

        let mut app = self::app();
        app.start_keyword_edit();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key(&mut app, ctrl_c), AppAction::Quit);
    }

    #[test]
    fn test_q_is_typed_while_editing_keyword() {
        let handler = EventHandler::new();
        let mut app = app();
        handler.handle_key(&mut app, key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Keyword);

        handler.handle_key(&mut app, key(KeyCode::Char('q')));
        assert_eq!(app.keyword, "q");
        assert!(!app.should_quit);
    }

    #[test]
    fn test_pick_and_filter_flow() {
        let handler = EventHandler::new();
        let mut app = app();
        handler.handle_key(&mut app, key(KeyCode::Char('j')));
        handler.handle_key(&mut app, key(KeyCode::Char('j')));
        assert_eq!(handler.handle_key(&mut app, key(KeyCode::Enter)), AppAction::None);
        assert_eq!(app.selected_file, Some(PathBuf::from("/logs/b.log")));

        handler.handle_key(&mut app, key(KeyCode::Tab));
        for c in "disc".chars() {
            handler.handle_key(&mut app, key(KeyCode::Char(c)));
        }
        let action = handler.handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(
            action,
            AppAction::Filter(PathBuf::from("/logs/b.log"), "disc".to_string())
        );
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_enter_on_parent_changes_dir() {
        let handler = EventHandler::new();
        let mut app = app();
        assert_eq!(
            handler.handle_key(&mut app, key(KeyCode::Enter)),
            AppAction::ChangeDir(PathBuf::from("/"))
        );
    }

    #[test]
    fn test_escape_leaves_keyword() {
        let handler = EventHandler::new();
        let mut app = app();
        handler.handle_key(&mut app, key(KeyCode::Char('/')));
        handler.handle_key(&mut app, key(KeyCode::Char('x')));
        handler.handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.keyword, "x");
    }

    #[test]
    fn test_toggle_and_rescan() {
        let handler = EventHandler::new();
        let mut app = app();
        assert_eq!(handler.handle_key(&mut app, key(KeyCode::Char('*'))), AppAction::Rescan);
        assert!(app.show_all);
        assert_eq!(handler.handle_key(&mut app, key(KeyCode::Char('r'))), AppAction::Rescan);
    }
}
