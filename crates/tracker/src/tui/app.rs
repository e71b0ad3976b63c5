//! Analyzer application state
//!
//! Holds the file picker, the selected log file, the keyword being edited
//! and whatever the results pane currently shows.

use events::{FilterResult, LogFileSummary};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigating the file picker
    Normal,
    /// Editing the filter keyword
    Keyword,
}

/// Content of the results pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    /// Nothing run yet
    Empty,
    /// Counts of the selected file
    Summary(LogFileSummary),
    /// Lines matching the keyword
    Matches(FilterResult),
    /// A failure or hint shown in place of results
    Message(String),
}

/// User action to be processed by the main loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// No action
    None,
    /// Quit the analyzer
    Quit,
    /// Summarize the file
    Analyze(PathBuf),
    /// Search the file for a keyword
    Filter(PathBuf, String),
    /// Re-read the directory listing
    Rescan,
    /// Browse another directory
    ChangeDir(PathBuf),
}

/// Message shown when Analyze or Filter runs before a file is picked
pub const NO_FILE_SELECTED: &str = "No file selected.";

/// One row of the file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEntry {
    /// The directory above the one being browsed
    Parent(PathBuf),
    Dir(PathBuf),
    File(PathBuf),
}

impl PickerEntry {
    pub fn path(&self) -> &Path {
        match self {
            PickerEntry::Parent(path) | PickerEntry::Dir(path) | PickerEntry::File(path) => path,
        }
    }

    /// Text shown in the picker; directories end with `/`
    pub fn label(&self) -> String {
        match self {
            PickerEntry::Parent(_) => "../".to_string(),
            PickerEntry::Dir(path) => format!("{}/", display_name(path)),
            PickerEntry::File(path) => display_name(path),
        }
    }
}

/// List `dir` for the picker
///
/// The parent comes first, then subdirectories, then files, each group
/// sorted. Files are limited to `.log` unless `show_all` is set.
pub fn scan_dir(dir: &Path, show_all: bool) -> io::Result<Vec<PickerEntry>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)?.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        } else if show_all || path.extension().is_some_and(|ext| ext == events::LOG_EXTENSION) {
            files.push(path);
        }
    }
    dirs.sort();
    files.sort();

    let parent = dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| PickerEntry::Parent(p.to_path_buf()));

    Ok(parent
        .into_iter()
        .chain(dirs.into_iter().map(PickerEntry::Dir))
        .chain(files.into_iter().map(PickerEntry::File))
        .collect())
}

/// Main application state
pub struct App {
    /// Directory the picker lists
    pub dir: PathBuf,
    /// Rows currently listed
    pub entries: Vec<PickerEntry>,
    /// Highlighted entry of the picker
    pub highlighted: usize,
    /// File chosen with Enter
    pub selected_file: Option<PathBuf>,
    /// List every file instead of `.log` files only
    pub show_all: bool,
    /// Filter keyword
    pub keyword: String,
    /// Current input mode
    pub input_mode: InputMode,
    /// What the results pane shows
    pub results: ResultView,
    /// Status message to display
    pub status_message: Option<String>,
    /// Should quit flag
    pub should_quit: bool,
}

impl App {
    /// Create a new application state for `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            entries: Vec::new(),
            highlighted: 0,
            selected_file: None,
            show_all: false,
            keyword: String::new(),
            input_mode: InputMode::Normal,
            results: ResultView::Empty,
            status_message: None,
            should_quit: false,
        }
    }

    /// Replace the listed rows, keeping the highlight in range
    pub fn set_entries(&mut self, entries: Vec<PickerEntry>) {
        self.entries = entries;
        if self.highlighted >= self.entries.len() {
            self.highlighted = self.entries.len().saturating_sub(1);
        }
        let files = self
            .entries
            .iter()
            .filter(|e| matches!(e, PickerEntry::File(_)))
            .count();
        self.set_status(format!("{} file(s) in {}", files, self.dir.display()));
    }

    /// The highlighted row, if any
    pub fn highlighted_entry(&self) -> Option<&PickerEntry> {
        self.entries.get(self.highlighted)
    }

    pub fn navigate_up(&mut self) {
        if self.highlighted > 0 {
            self.highlighted -= 1;
        }
    }

    pub fn navigate_down(&mut self) {
        if self.highlighted + 1 < self.entries.len() {
            self.highlighted += 1;
        }
    }

    /// Pick the highlighted file or enter the highlighted directory
    pub fn handle_enter(&mut self) -> AppAction {
        match self.highlighted_entry().cloned() {
            Some(PickerEntry::File(path)) => {
                self.set_status(format!("Selected {}", display_name(&path)));
                self.selected_file = Some(path);
                AppAction::None
            }
            Some(PickerEntry::Parent(path) | PickerEntry::Dir(path)) => AppAction::ChangeDir(path),
            None => AppAction::None,
        }
    }

    /// Browse `dir`; the caller rescans
    pub fn change_dir(&mut self, dir: PathBuf) {
        self.dir = dir;
        self.highlighted = 0;
    }

    /// Analyze the picked file
    pub fn handle_analyze(&mut self) -> AppAction {
        match &self.selected_file {
            Some(path) => AppAction::Analyze(path.clone()),
            None => {
                self.results = ResultView::Message(NO_FILE_SELECTED.to_string());
                AppAction::None
            }
        }
    }

    /// Toggle between `.log` files only and every file
    pub fn toggle_show_all(&mut self) -> AppAction {
        self.show_all = !self.show_all;
        AppAction::Rescan
    }

    pub fn handle_refresh(&mut self) -> AppAction {
        AppAction::Rescan
    }

    pub fn start_keyword_edit(&mut self) {
        self.input_mode = InputMode::Keyword;
    }

    pub fn handle_keyword_input(&mut self, c: char) {
        self.keyword.push(c);
    }

    pub fn handle_keyword_backspace(&mut self) {
        self.keyword.pop();
    }

    /// Run the filter on the picked file with the current keyword
    ///
    /// The keyword itself is validated by the filter.
    pub fn confirm_filter(&mut self) -> AppAction {
        self.input_mode = InputMode::Normal;
        match &self.selected_file {
            Some(path) => AppAction::Filter(path.clone(), self.keyword.clone()),
            None => {
                self.results = ResultView::Message(NO_FILE_SELECTED.to_string());
                AppAction::None
            }
        }
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}

/// File name of `path` for display
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
