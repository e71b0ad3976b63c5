//! Terminal log analyzer
//!
//! Browses the saved `.log` files of a directory, summarizes one or
//! searches it for a keyword. The picker can move up to the parent and
//! into subdirectories, so logs anywhere on disk can be opened.
//!
//! # Layout
//!
//! - **Top Panel**: Status bar with the picked file
//! - **Center Panel**: File picker (left) and results (right)
//! - **Bottom Panel**: Keyword field and help bar
//!
//! # Keybindings
//!
//! - `j/k` or arrow keys: Navigate files
//! - `Enter`: Pick the highlighted file or open the highlighted directory
//! - `a`: Analyze the picked file
//! - `/` or `Tab`: Edit the keyword, `Enter` runs the filter, `Esc` leaves
//! - `*`: Toggle between `.log` files and all files
//! - `r`: Rescan the directory
//! - `q` or `Ctrl+C`: Quit

pub mod app;
pub mod events;
pub mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::Event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use common::RawModeGuard;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs;
use std::io::{self, Stdout};
use std::path::Path;
use tracing::{debug, info, warn};

pub use self::app::{App, AppAction, PickerEntry, ResultView};
pub use self::events::EventHandler;

/// Apply an action to the application state
///
/// Every failure ends up in the results pane or the status bar.
pub fn perform_action(app: &mut App, action: AppAction) {
    match action {
        AppAction::None | AppAction::Quit => {}
        AppAction::Analyze(path) => {
            app.results = match ::events::summarize(&path) {
                Ok(summary) => ResultView::Summary(summary),
                Err(e) => failure_view(e),
            };
        }
        AppAction::Filter(path, keyword) => {
            app.results = match ::events::filter(&path, &keyword) {
                Ok(result) => {
                    app.set_status(format!("{} matching line(s)", result.lines.len()));
                    ResultView::Matches(result)
                }
                Err(e) => failure_view(e),
            };
        }
        AppAction::Rescan => rescan(app),
        AppAction::ChangeDir(dir) => {
            app.change_dir(dir);
            rescan(app);
        }
    }
}

/// Show a failed analysis in the results pane
fn failure_view(e: ::events::EventsError) -> ResultView {
    if e.is_read_failure() {
        warn!("{}", e);
    }
    ResultView::Message(e.to_string())
}

/// Re-read the directory listing into `app`
///
/// The directory is made absolute first so the parent entry always leads
/// somewhere.
pub fn rescan(app: &mut App) {
    if let Ok(dir) = fs::canonicalize(&app.dir) {
        app.dir = dir;
    }
    match app::scan_dir(&app.dir, app.show_all) {
        Ok(entries) => {
            debug!("Found {} entries in {}", entries.len(), app.dir.display());
            app.set_entries(entries);
        }
        Err(e) => {
            app.set_entries(Vec::new());
            app.set_status(format!("Cannot read {}: {}", app.dir.display(), e));
        }
    }
}

/// TUI runner that manages the terminal and event loop
pub struct TuiRunner {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    app: App,
    event_handler: EventHandler,
    _raw_mode: RawModeGuard,
}

impl TuiRunner {
    /// Create a new TUI runner browsing `dir`
    pub fn new(dir: &Path) -> Result<Self> {
        // Setup terminal; the guard leaves raw mode if any later step fails
        let raw_mode = RawModeGuard::enable().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                return Err(e).context("Failed to create terminal");
            }
        };

        let mut app = App::new(dir);
        rescan(&mut app);

        Ok(Self {
            terminal,
            app,
            event_handler: EventHandler::new(),
            _raw_mode: raw_mode,
        })
    }

    /// Run the TUI main loop
    pub fn run(&mut self) -> Result<()> {
        info!("Starting log analyzer in {}", self.app.dir.display());

        self.terminal.draw(|f| ui::render(f, &self.app))?;

        loop {
            if let Some(event) = self.event_handler.poll()? {
                let action = match event {
                    Event::Key(key) => self.event_handler.handle_key(&mut self.app, key),
                    _ => AppAction::None,
                };
                perform_action(&mut self.app, action);
            }

            if self.app.should_quit {
                break;
            }

            self.terminal.draw(|f| ui::render(f, &self.app))?;
        }

        info!("Log analyzer closed");
        Ok(())
    }
}

impl Drop for TuiRunner {
    fn drop(&mut self) {
        // Restore terminal state; raw mode ends when the guard drops
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the analyzer on `dir` until the user quits
pub fn run_analyzer(dir: &Path) -> Result<()> {
    let mut runner = TuiRunner::new(dir)?;
    runner.run()
}
