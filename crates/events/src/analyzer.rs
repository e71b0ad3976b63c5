//! Read-back analysis of saved log files
//!
//! [`summarize`] counts tagged records and [`filter`] selects lines by a
//! case-insensitive keyword. Neither assumes the file was produced by this
//! crate: any UTF-8 text file is accepted.

use crate::error::{EventsError, Result};
use crate::event::EventKind;
use crate::record::detect_kind;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Aggregate counts for one log file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFileSummary {
    /// Every line in the file, tagged or not
    pub total_lines: usize,
    /// Lines tagged `[Connected]`
    pub connected_count: usize,
    /// Lines tagged `[Disconnected]`
    pub disconnected_count: usize,
}

impl LogFileSummary {
    /// Lines that are neither connections nor disconnections
    pub fn other_count(&self) -> usize {
        self.total_lines
            .saturating_sub(self.connected_count)
            .saturating_sub(self.disconnected_count)
    }

    /// Summarize in-memory log text
    pub fn from_text(text: &str) -> Self {
        text.lines().fold(Self::default(), |mut summary, line| {
            summary.total_lines += 1;
            match detect_kind(line) {
                Some(EventKind::Connected) => summary.connected_count += 1,
                Some(EventKind::Disconnected) => summary.disconnected_count += 1,
                Some(EventKind::Other) | None => {}
            }
            summary
        })
    }
}

impl fmt::Display for LogFileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Log File Summary ===")?;
        writeln!(f, "Total Log Entries: {}", self.total_lines)?;
        writeln!(f, "Connected Events: {}", self.connected_count)?;
        write!(f, "Disconnected Events: {}", self.disconnected_count)
    }
}

/// Lines of a log file that matched a keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    /// Trimmed keyword that was searched for
    pub keyword: String,
    /// Matching lines, in file order
    pub lines: Vec<String>,
}

impl FilterResult {
    /// True when the search succeeded but nothing matched
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for FilterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "=== Logs Containing '{}' ===", self.keyword)?;
        if self.lines.is_empty() {
            return write!(f, "\nNo logs found with the given keyword.");
        }
        for line in &self.lines {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}

/// Read a log file in full
fn read_log(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| EventsError::ReadFailure {
        path: path.to_path_buf(),
        source,
    })
}

/// Count total, connected and disconnected lines of the file at `path`
pub fn summarize(path: &Path) -> Result<LogFileSummary> {
    let summary = LogFileSummary::from_text(&read_log(path)?);
    debug!("Summarized {}: {:?}", path.display(), summary);
    Ok(summary)
}

/// Select the lines of `path` containing `keyword`, ignoring case
///
/// A blank keyword is rejected before the file is opened.
pub fn filter(path: &Path, keyword: &str) -> Result<FilterResult> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(EventsError::InvalidInput(
            "Please enter a keyword to filter logs.".to_string(),
        ));
    }

    let text = read_log(path)?;
    let needle = keyword.to_lowercase();
    let lines: Vec<String> = text
        .lines()
        .filter(|line| line.to_lowercase().contains(&needle))
        .map(str::to_string)
        .collect();

    debug!(
        "Filter '{}' matched {} line(s) in {}",
        keyword,
        lines.len(),
        path.display()
    );
    Ok(FilterResult {
        keyword: keyword.to_string(),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_summary_from_text() {
        let text = "\
[Connected] Jan  5 10:22:31 - New USB device found
[Other] Jan  5 10:22:32 - reset high-speed USB device
[Disconnected] Jan  5 10:30:02 - USB disconnect
free-form note
";
        let summary = LogFileSummary::from_text(text);
        assert_eq!(summary.total_lines, 4);
        assert_eq!(summary.connected_count, 1);
        assert_eq!(summary.disconnected_count, 1);
        assert_eq!(summary.other_count(), 2);
    }

    #[test]
    fn test_summary_empty_text() {
        assert_eq!(LogFileSummary::from_text(""), LogFileSummary::default());
    }

    #[test]
    fn test_summary_counts_final_line_without_newline() {
        let summary = LogFileSummary::from_text("[Connected] a - b\n[Connected] c - d");
        assert_eq!(summary.total_lines, 2);
        assert_eq!(summary.connected_count, 2);
    }

    #[test]
    fn test_other_count_never_underflows() {
        let summary = LogFileSummary {
            total_lines: 1,
            connected_count: 1,
            disconnected_count: 1,
        };
        assert_eq!(summary.other_count(), 0);
    }

    #[test]
    fn test_summary_display() {
        let summary = LogFileSummary {
            total_lines: 5,
            connected_count: 3,
            disconnected_count: 2,
        };
        let text = summary.to_string();
        assert!(text.starts_with("=== Log File Summary ==="));
        assert!(text.contains("Total Log Entries: 5"));
        assert!(text.contains("Connected Events: 3"));
        assert!(text.contains("Disconnected Events: 2"));
    }

    #[test]
    fn test_summarize_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = summarize(&dir.path().join("nope.log")).unwrap_err();
        assert!(err.is_read_failure());
    }

    #[test]
    fn test_summarize_rejects_binary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.log");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        assert!(summarize(&path).unwrap_err().is_read_failure());
    }

    #[test]
    fn test_filter_blank_keyword_rejected_before_read() {
        // The path does not exist: a read attempt would yield ReadFailure.
        let err = filter(Path::new("/definitely/not/here.log"), "   ").unwrap_err();
        assert!(matches!(err, EventsError::InvalidInput(_)));
    }

    #[test]
    fn test_filter_no_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usb_logs.log");
        fs::write(&path, "[Connected] Jan  5 10:22:31 - New USB device found\n").unwrap();

        let result = filter(&path, "sandisk").unwrap();
        assert!(result.is_empty());
        assert!(result.to_string().contains("No logs found with the given keyword."));
    }

    #[test]
    fn test_filter_display_lists_lines() {
        let result = FilterResult {
            keyword: "disconnect".to_string(),
            lines: vec!["[Disconnected] a - USB disconnect".to_string()],
        };
        assert_eq!(
            result.to_string(),
            "=== Logs Containing 'disconnect' ===\n[Disconnected] a - USB disconnect"
        );
    }
}
