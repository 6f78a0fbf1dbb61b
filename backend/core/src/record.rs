use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::event::{Event, EventKind};

/// Inviter recorded when the platform could not tell who invited a user.
pub const UNKNOWN_INVITER: &str = "unknown";

/// Named per-record counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Counter {
    Messages,
    Calls,
}

impl Counter {
    /// The counter bumped by an event of `kind`, if any.
    pub fn for_kind(kind: EventKind) -> Option<Counter> {
        match kind {
            EventKind::Message => Some(Counter::Messages),
            EventKind::Call => Some(Counter::Calls),
            EventKind::Join | EventKind::Leave => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Counter::Messages => "messages",
            Counter::Calls => "calls",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Counter {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "messages" => Ok(Counter::Messages),
            "calls" => Ok(Counter::Calls),
            other => Err(TrackerError::Validation(format!("unknown counter '{other}'"))),
        }
    }
}

/// Increment-only counters of one record.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Counters {
    #[serde(default)]
    pub messages: u64,
    #[serde(default)]
    pub calls: u64,
}

impl Counters {
    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::Messages => self.messages,
            Counter::Calls => self.calls,
        }
    }

    /// Bump `counter` by one and return the new value.
    pub fn increment(&mut self, counter: Counter) -> u64 {
        let slot = match counter {
            Counter::Messages => &mut self.messages,
            Counter::Calls => &mut self.calls,
        };
        *slot = slot.saturating_add(1);
        *slot
    }
}

/// Durable per-user state: identity header, counters and event log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: String,
    pub invited_by: String,
    pub created_at: String,
    #[serde(flatten)]
    pub counters: Counters,
    /// Newest first.
    #[serde(default)]
    pub event_log: VecDeque<Event>,
}

impl UserRecord {
    pub fn new(
        user_id: impl Into<String>,
        invited_by: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            invited_by: invited_by.into(),
            created_at: created_at.into(),
            counters: Counters::default(),
            event_log: VecDeque::new(),
        }
    }

    /// Prepend `event` to the log and bump the matching counter.
    ///
    /// Returns the counter touched and its new value.
    pub fn apply(&mut self, event: Event) -> Option<(Counter, u64)> {
        let bumped = Counter::for_kind(event.kind)
            .map(|counter| (counter, self.counters.increment(counter)));
        self.event_log.push_front(event);
        bumped
    }

    /// Most recent event of `kind`; a forward scan since the log is newest first.
    pub fn last_of_kind(&self, kind: EventKind) -> Option<&Event> {
        self.event_log.iter().find(|event| event.kind == kind)
    }

    pub fn counter(&self, counter: Counter) -> u64 {
        self.counters.get(counter)
    }
}
