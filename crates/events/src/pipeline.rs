//! Extraction pipeline
//!
//! Fetches a raw kernel log snapshot from a [`LogSource`], parses it and
//! hands the events to a [`LogWriter`]. Prompting for the destination name
//! is left to the caller: fetch first, ask only when
//! [`RawLog::has_events`] is true, then save.

use crate::error::{EventsError, Result};
use crate::parser::parse_events;
use crate::writer::{LogWriter, WriteOutcome, log_file_path};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Supplier of pre-filtered kernel log text
pub trait LogSource {
    /// Short name used in diagnostics
    fn name(&self) -> &str;

    /// Fetch the current snapshot
    ///
    /// Implementations return [`EventsError::SourceUnavailable`] when the
    /// underlying log cannot be reached.
    fn fetch(&self) -> Result<String>;
}

impl<S: LogSource + ?Sized> LogSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self) -> Result<String> {
        (**self).fetch()
    }
}

/// A fetched kernel log snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLog {
    text: String,
}

impl RawLog {
    /// Wrap raw text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Raw text of the snapshot
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when at least one line parses into an event
    pub fn has_events(&self) -> bool {
        parse_events(&self.text).next().is_some()
    }
}

/// Parse `raw` and write its events to `<output_dir>/<name>.log`
///
/// Records are echoed to `console` as they are written.
pub fn extract_and_save<W: Write>(
    raw: &str,
    name: &str,
    output_dir: &Path,
    console: W,
) -> Result<WriteOutcome> {
    let path = log_file_path(output_dir, name);
    let mut events = parse_events(raw);
    let outcome = LogWriter::new(console).write(&path, events.by_ref())?;

    let skipped = events.skipped();
    if skipped > 0 {
        debug!("Skipped {} line(s) without a USB bus token", skipped);
    }
    Ok(outcome)
}

/// Drives a log source through parsing and writing
pub struct EventPipeline<S: LogSource> {
    source: S,
    output_dir: PathBuf,
}

impl<S: LogSource> EventPipeline<S> {
    /// Create a pipeline writing into `output_dir`
    pub fn new(source: S, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
        }
    }

    /// Directory log files are written into
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Fetch a snapshot from the source
    ///
    /// Blank output is treated as an unavailable source.
    pub fn fetch(&self) -> Result<RawLog> {
        debug!("Fetching kernel log from {}", self.source.name());
        let text = self.source.fetch()?;
        if text.trim().is_empty() {
            return Err(EventsError::SourceUnavailable(format!(
                "{} returned no USB events",
                self.source.name()
            )));
        }
        Ok(RawLog::new(text))
    }

    /// Write the events of `raw` under destination `name`
    pub fn save<W: Write>(&self, raw: &RawLog, name: &str, console: W) -> Result<WriteOutcome> {
        let outcome = extract_and_save(raw.text(), name, &self.output_dir, console)?;
        if let WriteOutcome::Written(report) = &outcome {
            info!("Logs saved to: {}", report.path.display());
        }
        Ok(outcome)
    }

    /// Fetch and save in one step
    pub fn run<W: Write>(&self, name: &str, console: W) -> Result<WriteOutcome> {
        let raw = self.fetch()?;
        self.save(&raw, name, console)
    }
}
