//! Log file writer
//!
//! Serializes events into a `<name>.log` file and mirrors every record to a
//! console writer in the same order.

use crate::error::{EventsError, Result};
use crate::event::{Event, EventKind};
use crate::record::LogRecord;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Base name used when the caller supplies a blank destination
pub const DEFAULT_LOG_NAME: &str = "usb_logs";

/// Extension appended to every destination name
pub const LOG_EXTENSION: &str = "log";

/// Resolve a user-supplied destination name to a log file path
///
/// Blank names fall back to [`DEFAULT_LOG_NAME`]. The `.log` extension is
/// always appended.
pub fn log_file_path(output_dir: &Path, name: &str) -> PathBuf {
    let name = name.trim();
    let base = if name.is_empty() { DEFAULT_LOG_NAME } else { name };
    output_dir.join(format!("{}.{}", base, LOG_EXTENSION))
}

/// Result of a write request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The event sequence was empty; no file was touched
    NoEvents,
    /// Records were written to `path`
    Written(WriteReport),
}

/// Counts for a completed write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// File that now holds the records
    pub path: PathBuf,
    /// Total records written
    pub records: usize,
    /// Records tagged `[Connected]`
    pub connected: usize,
    /// Records tagged `[Disconnected]`
    pub disconnected: usize,
}

impl WriteReport {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            records: 0,
            connected: 0,
            disconnected: 0,
        }
    }

    fn count(&mut self, kind: EventKind) {
        self.records += 1;
        match kind {
            EventKind::Connected => self.connected += 1,
            EventKind::Disconnected => self.disconnected += 1,
            EventKind::Other => {}
        }
    }
}

/// Writes event records to a log file and echoes them to a console
pub struct LogWriter<W: Write> {
    console: W,
}

impl<W: Write> LogWriter<W> {
    /// Create a writer echoing to `console`
    pub fn new(console: W) -> Self {
        Self { console }
    }

    /// Consume the writer, returning the console sink
    pub fn into_console(self) -> W {
        self.console
    }

    /// Write one record per event to `path`, truncating any existing file
    ///
    /// An empty event sequence yields [`WriteOutcome::NoEvents`] and leaves
    /// the filesystem untouched.
    pub fn write<I>(&mut self, path: &Path, events: I) -> Result<WriteOutcome>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut events = events.into_iter().peekable();
        if events.peek().is_none() {
            debug!("No events to write, skipping {}", path.display());
            return Ok(WriteOutcome::NoEvents);
        }

        let write_failure = |source: io::Error| EventsError::WriteFailure {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(write_failure)?;
        let mut file = BufWriter::new(file);
        let mut report = WriteReport::new(path.to_path_buf());

        for event in events {
            let record = LogRecord::new(&event);
            writeln!(file, "{}", record).map_err(write_failure)?;
            writeln!(self.console, "{}", record).map_err(EventsError::Echo)?;
            report.count(record.kind());
        }

        file.flush().map_err(write_failure)?;
        self.console.flush().map_err(EventsError::Echo)?;

        info!(
            "Wrote {} record(s) to {} ({} connected, {} disconnected)",
            report.records,
            path.display(),
            report.connected,
            report.disconnected
        );
        Ok(WriteOutcome::Written(report))
    }
}
