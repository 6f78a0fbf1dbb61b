use std::fmt;
use std::str::FromStr;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Local-clock format used for every recorded timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time rendered with [`TIMESTAMP_FORMAT`].
pub fn local_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Kinds of activity observed on the chat platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A text message was sent
    Message,
    /// The user joined a voice channel
    Call,
    /// The user joined the server
    Join,
    /// The user left the server
    Leave,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Message,
        EventKind::Call,
        EventKind::Join,
        EventKind::Leave,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Message => "Message",
            EventKind::Call => "Call",
            EventKind::Join => "Join",
            EventKind::Leave => "Leave",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TrackerError::Validation(format!("unknown event kind '{s}'")))
    }
}

/// One entry of a user's event log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// Externally supplied, treated as an opaque ordering token.
    pub timestamp: String,
    #[serde(default)]
    pub content: String,
}

impl Event {
    pub fn new(kind: EventKind, timestamp: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            timestamp: timestamp.into(),
            content: content.into(),
        }
    }
}
