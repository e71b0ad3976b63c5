//! Event pipeline error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while extracting, saving or analyzing USB event logs
#[derive(Debug, Error)]
pub enum EventsError {
    /// The kernel log source could not be reached or produced nothing
    #[error("Log source unavailable: {0}")]
    SourceUnavailable(String),

    /// The destination log file could not be created or written
    #[error("Failed to write log file {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A log file selected for analysis could not be read
    #[error("Error reading file {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Caller supplied unusable input (e.g. a blank filter keyword)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Mirroring a record to the console failed
    #[error("Failed to echo record to console: {0}")]
    Echo(#[source] std::io::Error),
}

impl EventsError {
    /// Returns true for the read-back failures shown by the analyzer
    pub fn is_read_failure(&self) -> bool {
        matches!(self, EventsError::ReadFailure { .. })
    }
}

/// Type alias for event pipeline results
pub type Result<T> = std::result::Result<T, EventsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_failure_display() {
        let err = EventsError::WriteFailure {
            path: PathBuf::from("/nonexistent/usb_logs.log"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Failed to write log file"));
        assert!(msg.contains("/nonexistent/usb_logs.log"));
        assert!(msg.contains("no such directory"));
    }

    #[test]
    fn test_read_failure_classification() {
        let err = EventsError::ReadFailure {
            path: PathBuf::from("missing.log"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.is_read_failure());
        assert!(!EventsError::InvalidInput("blank".into()).is_read_failure());
    }
}
