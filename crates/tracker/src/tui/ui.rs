//! Analyzer rendering with ratatui

use events::{EventKind, detect_kind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::{App, InputMode, PickerEntry, ResultView, display_name};

/// Colors used in the UI
mod colors {
    use ratatui::style::Color;

    pub const CONNECTED: Color = Color::Green;
    pub const DISCONNECTED: Color = Color::Red;
    pub const OTHER: Color = Color::Cyan;
    pub const MESSAGE: Color = Color::Yellow;
    pub const DIRECTORY: Color = Color::Blue;

    pub const ACTIVE_BORDER: Color = Color::Cyan;
    pub const INACTIVE_BORDER: Color = Color::Gray;

    pub const HIGHLIGHT_BG: Color = Color::DarkGray;
    pub const STATUS_BAR_BG: Color = Color::Blue;
    pub const HELP_BAR_BG: Color = Color::DarkGray;
}

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(8),    // File picker + results
            Constraint::Length(3), // Keyword field
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_status_bar(frame, app, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);
    render_file_list(frame, app, panes[0]);
    render_results(frame, app, panes[1]);

    render_keyword_field(frame, app, chunks[2]);
    render_help_bar(frame, app, chunks[3]);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app
        .selected_file
        .as_deref()
        .map(display_name)
        .unwrap_or_else(|| "none".to_string());

    let status_message = app
        .status_message
        .as_ref()
        .map(|m| format!(" | {}", m))
        .unwrap_or_default();

    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" Selected: {}", selected),
            Style::default().fg(Color::White),
        ),
        Span::styled(status_message, Style::default().fg(Color::Yellow)),
    ]))
    .style(Style::default().bg(colors::STATUS_BAR_BG))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" USB Log Analyzer ")
            .title_style(Style::default().add_modifier(Modifier::BOLD)),
    );

    frame.render_widget(paragraph, area);
}

fn render_file_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.input_mode == InputMode::Normal;
    let border_color = if is_active {
        colors::ACTIVE_BORDER
    } else {
        colors::INACTIVE_BORDER
    };

    let title = if app.show_all {
        " All Files "
    } else {
        " Log Files (*.log) "
    };

    let items: Vec<ListItem> = if app.entries.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "  (no files)",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.entries
            .iter()
            .map(|entry| match entry {
                PickerEntry::File(path) => {
                    let picked = app.selected_file.as_ref() == Some(path);
                    let marker = if picked { "[*] " } else { "[ ] " };
                    ListItem::new(Line::from(vec![
                        Span::raw(marker),
                        Span::raw(entry.label()),
                    ]))
                }
                PickerEntry::Parent(_) | PickerEntry::Dir(_) => ListItem::new(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(entry.label(), Style::default().fg(colors::DIRECTORY)),
                ])),
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(title),
        )
        .highlight_style(
            Style::default()
                .bg(colors::HIGHLIGHT_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.entries.is_empty() {
        state.select(Some(app.highlighted));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Color a log line by the tag it carries
fn log_line(line: &str) -> Line<'_> {
    match detect_kind(line) {
        Some(kind) => {
            let color = match kind {
                EventKind::Connected => colors::CONNECTED,
                EventKind::Disconnected => colors::DISCONNECTED,
                EventKind::Other => colors::OTHER,
            };
            Line::from(vec![
                Span::styled(format!("{} ", kind.glyph()), Style::default().fg(color)),
                Span::raw(line),
            ])
        }
        None => Line::from(line),
    }
}

/// Lines shown in the results pane
pub fn result_lines(results: &ResultView) -> Vec<Line<'_>> {
    match results {
        ResultView::Empty => vec![Line::from(Span::styled(
            "Pick a file with Enter, then press 'a' to analyze or '/' to filter.",
            Style::default().fg(Color::DarkGray),
        ))],
        ResultView::Summary(summary) => summary
            .to_string()
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect(),
        ResultView::Matches(result) => {
            let mut lines = vec![Line::from(Span::styled(
                format!("=== Logs Containing '{}' ===", result.keyword),
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            if result.is_empty() {
                lines.push(Line::from("No logs found with the given keyword."));
            } else {
                lines.extend(result.lines.iter().map(|l| log_line(l)));
            }
            lines
        }
        ResultView::Message(message) => vec![Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(colors::MESSAGE),
        ))],
    }
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = Paragraph::new(result_lines(&app.results))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::INACTIVE_BORDER))
                .title(" Results "),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_keyword_field(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Keyword;
    let border_color = if editing {
        colors::ACTIVE_BORDER
    } else {
        colors::INACTIVE_BORDER
    };

    let paragraph = Paragraph::new(app.keyword.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Keyword "),
    );
    frame.render_widget(paragraph, area);

    if editing {
        let x = area.x + 1 + app.keyword.chars().count() as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_help_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.input_mode {
        InputMode::Normal => {
            "j/k: Navigate | Enter: Select/Open | a: Analyze | /: Keyword | *: All files | r: Rescan | q: Quit"
        }
        InputMode::Keyword => "Enter: Filter | Esc: Back",
    };

    let paragraph = Paragraph::new(help_text)
        .style(Style::default().fg(Color::White).bg(colors::HELP_BAR_BG))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
