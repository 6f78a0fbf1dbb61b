//! Activity service: the inbound surface the chat adapter and CLI call.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use tracker_core::{Counter, EventKind, TrackerError, UNKNOWN_INVITER};
use tracker_logging::redact_sensitive_data;
use tracker_store::{RecordStore, Recorded};

/// Per-user figures shown by `get-user-activity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserActivity {
    pub user_id: String,
    pub last_message: Option<String>,
    pub last_call: Option<String>,
    pub messages: u64,
    pub calls: u64,
}

/// Both server rankings, highest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerActivity {
    pub by_messages: Vec<(String, u64)>,
    pub by_calls: Vec<(String, u64)>,
}

/// What is known about a member at the moment they leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Departure {
    pub user_id: String,
    pub invited_by: Option<String>,
    pub joined_at: Option<String>,
    pub messages: u64,
    pub calls: u64,
}

pub struct ActivityService {
    store: Arc<RecordStore>,
    default_top_n: usize,
    redact_content: bool,
}

impl ActivityService {
    pub fn new(store: Arc<RecordStore>, default_top_n: usize) -> Self {
        Self {
            store,
            default_top_n,
            redact_content: true,
        }
    }

    /// Whether message content is scrubbed before it is logged.
    pub fn with_redaction(mut self, redact: bool) -> Self {
        self.redact_content = redact;
        self
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn default_top_n(&self) -> usize {
        self.default_top_n
    }

    pub async fn on_event(
        &self,
        user_id: &str,
        kind: EventKind,
        timestamp: &str,
        content: &str,
    ) -> Result<Recorded, TrackerError> {
        if self.redact_content {
            debug!(user_id = %user_id, kind = %kind, content = %redact_sensitive_data(content), "Inbound event");
        } else {
            debug!(user_id = %user_id, kind = %kind, content = %content, "Inbound event");
        }
        let recorded = self.store.record_event(user_id, kind, timestamp, content).await;
        if let Err(e) = &recorded {
            warn!(user_id = %user_id, kind = %kind, error = %e, "Event not fully recorded");
        }
        recorded
    }

    /// A member joined: create their record, then log the join itself.
    pub async fn on_member_join(&self, user_id: &str, timestamp: &str) -> Result<Recorded, TrackerError> {
        let created = self.store.create(user_id, UNKNOWN_INVITER, timestamp).await?;
        if !created {
            info!(user_id = %user_id, "Member rejoined");
        }
        self.on_event(user_id, EventKind::Join, timestamp, "Joined the server").await
    }

    /// A member left: log the departure and gather their totals.
    pub async fn on_member_leave(&self, user_id: &str, timestamp: &str) -> Result<Departure, TrackerError> {
        self.on_event(user_id, EventKind::Leave, timestamp, "Left the server").await?;
        let summary = self.store.user_summary(user_id).await;
        Ok(Departure {
            user_id: user_id.to_string(),
            invited_by: summary.as_ref().map(|s| s.invited_by.clone()),
            joined_at: summary.as_ref().and_then(|s| s.last_join.clone()),
            messages: summary.as_ref().map_or(0, |s| s.messages),
            calls: summary.as_ref().map_or(0, |s| s.calls),
        })
    }

    /// Unknown users read as no activity rather than an error.
    pub async fn on_query_user(&self, user_id: &str) -> UserActivity {
        match self.store.user_summary(user_id).await {
            Some(summary) => UserActivity {
                user_id: summary.user_id,
                last_message: summary.last_message,
                last_call: summary.last_call,
                messages: summary.messages,
                calls: summary.calls,
            },
            None => UserActivity {
                user_id: user_id.to_string(),
                last_message: None,
                last_call: None,
                messages: 0,
                calls: 0,
            },
        }
    }

    /// `None` uses the configured default length.
    pub async fn on_query_server(&self, n: Option<usize>) -> ServerActivity {
        let n = n.filter(|n| *n > 0).unwrap_or(self.default_top_n);
        ServerActivity {
            by_messages: self.store.top_n(Counter::Messages, n).await,
            by_calls: self.store.top_n(Counter::Calls, n).await,
        }
    }
}
