//! USB event pipeline for usb-tracker
//!
//! This crate turns kernel log text into USB connect/disconnect events,
//! persists them as a tagged `.log` file and reads such files back for
//! summaries and keyword searches.
//!
//! # Example
//!
//! ```
//! use events::{EventKind, parse_events};
//!
//! let raw = "Jan  5 10:22:31 host kernel: usb 1-1: New USB device found, idVendor=1234";
//! let events: Vec<_> = parse_events(raw).collect();
//!
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].timestamp, "Jan  5 10:22:31");
//! assert_eq!(events[0].kind, EventKind::Connected);
//! ```
//!
//! # Log File Format
//!
//! One record per line, tag first:
//!
//! ```text
//! [Connected] Jan  5 10:22:31 - New USB device found, idVendor=1234
//! [Disconnected] Jan  5 10:30:02 - USB disconnect, device number 7
//! [Other] Jan  5 10:30:09 - reset high-speed USB device number 8
//! ```

pub mod analyzer;
pub mod error;
pub mod event;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod writer;

pub use analyzer::{FilterResult, LogFileSummary, filter, summarize};
pub use error::{EventsError, Result};
pub use event::{CONNECTED_MARKER, DISCONNECTED_MARKER, Event, EventKind};
pub use parser::{Events, parse_events, parse_line};
pub use pipeline::{EventPipeline, LogSource, RawLog, extract_and_save};
pub use record::{LogRecord, detect_kind};
pub use writer::{DEFAULT_LOG_NAME, LOG_EXTENSION, LogWriter, WriteOutcome, WriteReport, log_file_path};
