//! Read-only queries over the record store.

use serde::Serialize;
use tracker_core::{Counter, Event, EventKind, UserRecord};

use crate::store::RecordStore;

/// Everything the user summary needs, read from one consistent snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub user_id: String,
    pub invited_by: String,
    pub created_at: String,
    pub last_join: Option<String>,
    pub last_message: Option<String>,
    pub last_call: Option<String>,
    pub messages: u64,
    pub calls: u64,
}

impl UserSummary {
    fn from_record(record: &UserRecord) -> Self {
        let last = |kind| record.last_of_kind(kind).map(|e| e.timestamp.clone());
        Self {
            user_id: record.user_id.clone(),
            invited_by: record.invited_by.clone(),
            created_at: record.created_at.clone(),
            last_join: last(EventKind::Join),
            last_message: last(EventKind::Message),
            last_call: last(EventKind::Call),
            messages: record.counter(Counter::Messages),
            calls: record.counter(Counter::Calls),
        }
    }
}

impl RecordStore {
    /// Most recent event of `kind` for `user_id`.
    pub async fn last_event_of_kind(&self, user_id: &str, kind: EventKind) -> Option<Event> {
        let state = self.state.read().await;
        state.get(user_id)?.last_of_kind(kind).cloned()
    }

    /// Counter value; zero when the user has no record.
    pub async fn counter_total(&self, user_id: &str, counter: Counter) -> u64 {
        let state = self.state.read().await;
        state
            .get(user_id)
            .map(|record| record.counter(counter))
            .unwrap_or(0)
    }

    pub async fn inviter(&self, user_id: &str) -> Option<String> {
        let state = self.state.read().await;
        state.get(user_id).map(|record| record.invited_by.clone())
    }

    pub async fn user_summary(&self, user_id: &str) -> Option<UserSummary> {
        let state = self.state.read().await;
        state.get(user_id).map(UserSummary::from_record)
    }

    /// Top `n` users by `counter`, highest first.
    ///
    /// Ties keep insertion order. Zero values are included.
    pub async fn top_n(&self, counter: Counter, n: usize) -> Vec<(String, u64)> {
        let state = self.state.read().await;
        let mut ranked: Vec<(String, u64)> = state
            .records()
            .iter()
            .map(|record| (record.user_id.clone(), record.counter(counter)))
            .collect();

        // `sort_by` is stable, so equal counts stay in insertion order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}
