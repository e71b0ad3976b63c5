//! Kernel log parsing
//!
//! Turns raw kernel log text into [`Event`]s. A line yields an event only
//! when it carries both a syslog-style timestamp and a `usb <bus>-<port>:`
//! token; every other line is skipped without error.

use crate::event::Event;
use regex::Regex;
use std::str::Lines;
use std::sync::LazyLock;

/// Timestamp (`Mon DD HH:MM:SS`) followed, anywhere later in the line, by
/// the bus path token. Whitespace between tokens may repeat. The `.*` is
/// greedy: when a line holds several bus tokens, the description starts
/// after the last one.
static BUS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+\s+\d+\s+\d+:\d+:\d+).*usb\s+\d+-\d+:\s+(.*)")
        .expect("bus line pattern is valid")
});

/// Parse a single kernel log line
///
/// Returns `None` when the line does not match the bus line pattern.
pub fn parse_line(line: &str) -> Option<Event> {
    let captures = BUS_LINE.captures(line)?;
    let timestamp = captures.get(1)?.as_str();
    let description = captures.get(2)?.as_str();
    Some(Event::new(timestamp, description))
}

/// Lazily parse every line of `raw`
pub fn parse_events(raw: &str) -> Events<'_> {
    Events {
        lines: raw.lines(),
        skipped: 0,
    }
}

/// Iterator over the events of a raw kernel log extract
///
/// Borrows the input and can only be walked once.
#[derive(Debug)]
pub struct Events<'a> {
    lines: Lines<'a>,
    skipped: usize,
}

impl Events<'_> {
    /// Non-empty lines dropped so far because they did not match
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for Events<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        for line in self.lines.by_ref() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(event) => return Some(event),
                None => self.skipped += 1,
            }
        }
        None
    }
}
