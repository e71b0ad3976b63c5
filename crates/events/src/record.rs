//! Log record line format
//!
//! Every record is one line: `<tag> <timestamp> - <description>`, where the
//! tag is `[Connected]`, `[Disconnected]` or `[Other]`. Read-back code keys
//! on the tag token at the start of the line.
//!
//! Files written by the older decorated format (`✅ **[Connected]** ...`)
//! are still recognised when reading.

use crate::event::{Event, EventKind};
use std::fmt;

/// One persisted line of a USB event log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord<'a> {
    event: &'a Event,
}

impl<'a> LogRecord<'a> {
    /// Wrap an event for serialization
    pub fn new(event: &'a Event) -> Self {
        Self { event }
    }

    /// Kind of the wrapped event
    pub fn kind(&self) -> EventKind {
        self.event.kind
    }
}

impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {}",
            self.event.kind.tag(),
            self.event.timestamp,
            self.event.description
        )
    }
}

/// Detect the record kind of a line read back from a log file
///
/// Returns `None` for lines that carry no recognisable tag.
pub fn detect_kind(line: &str) -> Option<EventKind> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;

    if let Some(kind) = EventKind::from_tag(first) {
        return Some(kind);
    }

    detect_legacy_kind(first, tokens.next())
}

/// Older files start with a glyph followed by `**[Tag]**`
fn detect_legacy_kind(glyph: &str, tag: Option<&str>) -> Option<EventKind> {
    let kind = match glyph {
        "✅" => EventKind::Connected,
        "❌" => EventKind::Disconnected,
        _ => return None,
    };
    let tag = tag?.trim_matches('*');
    (EventKind::from_tag(tag) == Some(kind)).then_some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_format() {
        let event = Event::new("Jan  5 10:22:31", "New USB device found, idVendor=1234");
        let line = LogRecord::new(&event).to_string();
        assert_eq!(
            line,
            "[Connected] Jan  5 10:22:31 - New USB device found, idVendor=1234"
        );
    }

    #[test]
    fn test_record_format_other() {
        let event = Event::new("Feb 11 23:59:59", "reset full-speed USB device number 3");
        assert_eq!(
            LogRecord::new(&event).to_string(),
            "[Other] Feb 11 23:59:59 - reset full-speed USB device number 3"
        );
    }

    #[test]
    fn test_detect_written_records() {
        for (timestamp, description, kind) in [
            ("Jan  5 10:22:31", "New USB device found", EventKind::Connected),
            ("Jan  5 10:30:02", "USB disconnect, device number 7", EventKind::Disconnected),
            ("Jan  5 10:30:09", "reset high-speed USB device", EventKind::Other),
        ] {
            let event = Event::new(timestamp, description);
            let line = LogRecord::new(&event).to_string();
            assert_eq!(detect_kind(&line), Some(kind));
        }
    }

    #[test]
    fn test_tag_must_lead_the_line() {
        assert_eq!(detect_kind("note: [Connected] was seen"), None);
        assert_eq!(detect_kind(""), None);
        assert_eq!(detect_kind("   "), None);
    }

    #[test]
    fn test_detect_legacy_format() {
        assert_eq!(
            detect_kind("✅ **[Connected]** Jan  5 10:22:31 - New USB device found"),
            Some(EventKind::Connected)
        );
        assert_eq!(
            detect_kind("❌ **[Disconnected]** Jan  5 10:30:02 - USB disconnect"),
            Some(EventKind::Disconnected)
        );
        assert_eq!(detect_kind("🔹 Jan  5 10:30:09 - reset"), None);
        assert_eq!(detect_kind("✅ **[Disconnected]** mismatched"), None);
    }
}
