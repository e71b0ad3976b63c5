//! USB event types extracted from the kernel log

use std::fmt;

/// Substring that marks a device arrival in the kernel log
pub const CONNECTED_MARKER: &str = "New USB device found";

/// Substring that marks a device removal in the kernel log
pub const DISCONNECTED_MARKER: &str = "USB disconnect";

/// Classification of a kernel log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A new device was enumerated on the bus
    Connected,
    /// A device was removed from the bus
    Disconnected,
    /// Any other message for the bus path
    Other,
}

impl EventKind {
    /// All kinds, in classification order
    pub const ALL: [EventKind; 3] = [
        EventKind::Connected,
        EventKind::Disconnected,
        EventKind::Other,
    ];

    /// Classify a description by marker substring.
    ///
    /// Connected is checked first, so a description carrying both markers
    /// is a connection.
    pub fn classify(description: &str) -> Self {
        if description.contains(CONNECTED_MARKER) {
            EventKind::Connected
        } else if description.contains(DISCONNECTED_MARKER) {
            EventKind::Disconnected
        } else {
            EventKind::Other
        }
    }

    /// Bracketed tag written at the start of every log record
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::Connected => "[Connected]",
            EventKind::Disconnected => "[Disconnected]",
            EventKind::Other => "[Other]",
        }
    }

    /// Display glyph, never persisted
    pub fn glyph(&self) -> &'static str {
        match self {
            EventKind::Connected => "✅",
            EventKind::Disconnected => "❌",
            EventKind::Other => "🔹",
        }
    }

    /// Parse a bracketed tag token
    pub fn from_tag(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == token)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Connected => "Connected",
            EventKind::Disconnected => "Disconnected",
            EventKind::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A USB event extracted from one kernel log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Kernel log timestamp, verbatim (e.g. `Jan  5 10:22:31`)
    pub timestamp: String,
    /// Message text following the `usb N-N:` bus token
    pub description: String,
    /// Classification derived from `description`
    pub kind: EventKind,
}

impl Event {
    /// Create an event, classifying it from its description
    pub fn new(timestamp: impl Into<String>, description: impl Into<String>) -> Self {
        let description = description.into();
        let kind = EventKind::classify(&description);
        Self {
            timestamp: timestamp.into(),
            description,
            kind,
        }
    }
}
