//! Event ingestion: create-if-missing, append, count, persist.

use tracing::{debug, info};
use tracker_core::{Counter, Event, EventKind, TrackerError, UserRecord, UNKNOWN_INVITER};

use crate::store::RecordStore;

/// What one ingested event did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    /// The record was created implicitly by this event.
    pub created: bool,
    /// Counter bumped by the event and its new value.
    pub counter: Option<(Counter, u64)>,
    /// Log length after the append.
    pub log_len: usize,
}

fn validate(user_id: &str, timestamp: &str) -> Result<(), TrackerError> {
    if user_id.trim().is_empty() {
        return Err(TrackerError::Validation("user id is empty".to_string()));
    }
    if timestamp.trim().is_empty() {
        return Err(TrackerError::Validation(format!(
            "event for '{user_id}' has no timestamp"
        )));
    }
    Ok(())
}

impl RecordStore {
    /// Record one event for `user_id`, creating the record first if needed.
    ///
    /// Validation failures abort before anything is touched. A persist
    /// failure leaves the mutation in memory and returns
    /// [`TrackerError::Persistence`].
    pub async fn record_event(
        &self,
        user_id: &str,
        kind: EventKind,
        timestamp: &str,
        content: &str,
    ) -> Result<Recorded, TrackerError> {
        validate(user_id, timestamp)?;

        let mut state = self.state.write().await;
        let (record, created) = state.get_or_insert_with(user_id, || {
            UserRecord::new(user_id, UNKNOWN_INVITER, timestamp)
        });
        if created {
            info!(user_id = %user_id, "No record for user; created one");
        }

        let counter = record.apply(Event::new(kind, timestamp, content));
        let log_len = record.event_log.len();
        if let Some((name, value)) = counter {
            debug!(user_id = %user_id, counter = %name, value, "Counter incremented");
        }
        debug!(user_id = %user_id, kind = %kind, timestamp = %timestamp, "Event appended");

        self.persist(&state).await?;
        Ok(Recorded {
            created,
            counter,
            log_len,
        })
    }

    /// Like [`record_event`](Self::record_event) but with the kind as text,
    /// as delivered by external callers.
    pub async fn record_raw(
        &self,
        user_id: &str,
        kind: &str,
        timestamp: &str,
        content: &str,
    ) -> Result<Recorded, TrackerError> {
        let kind: EventKind = kind.parse()?;
        self.record_event(user_id, kind, timestamp, content).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::{MemoryBackend, SnapshotBackend};

    async fn open_store() -> (Arc<RecordStore>, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = RecordStore::open(backend.clone()).await.unwrap();
        (Arc::new(store), backend)
    }

    #[tokio::test]
    async fn test_unknown_user_is_created_implicitly() {
        let (store, backend) = open_store().await;
        let recorded = store
            .record_event("newbie", EventKind::Message, "t1", "hello")
            .await
            .unwrap();
        assert!(recorded.created);
        assert_eq!(recorded.log_len, 1);

        let record = store.get("newbie").await.unwrap();
        assert_eq!(record.invited_by, UNKNOWN_INVITER);
        assert_eq!(record.created_at, "t1");
        assert_eq!(record.event_log.len(), 1);
        assert_eq!(backend.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_message_count_matches_events() {
        let (store, _) = open_store().await;
        for i in 0..25 {
            store
                .record_event("chatty", EventKind::Message, &format!("t{i}"), "msg")
                .await
                .unwrap();
        }
        let record = store.get("chatty").await.unwrap();
        assert_eq!(record.counter(Counter::Messages), 25);
        assert_eq!(record.counter(Counter::Calls), 0);
    }

    #[tokio::test]
    async fn test_existing_record_keeps_header() {
        let (store, _) = open_store().await;
        store.create("u", "inviter", "t0").await.unwrap();
        let recorded = store
            .record_event("u", EventKind::Call, "t1", "Joined General")
            .await
            .unwrap();
        assert!(!recorded.created);
        assert_eq!(recorded.counter, Some((Counter::Calls, 1)));

        let record = store.get("u").await.unwrap();
        assert_eq!(record.invited_by, "inviter");
        assert_eq!(record.created_at, "t0");
    }

    #[tokio::test]
    async fn test_missing_timestamp_is_rejected_without_side_effects() {
        let (store, backend) = open_store().await;
        let err = store
            .record_event("u", EventKind::Message, "", "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
        assert!(store.get("u").await.is_none());
        assert!(backend.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_kind_is_rejected() {
        let (store, _) = open_store().await;
        let err = store.record_raw("u", "Reaction", "t0", "").await.unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
        assert!(store.is_empty().await);

        let ok = store.record_raw("u", "call", "t1", "").await.unwrap();
        assert_eq!(ok.counter, Some((Counter::Calls, 1)));
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_durable_copy_unchanged() {
        let (store, backend) = open_store().await;
        store
            .record_event("u", EventKind::Message, "t1", "first")
            .await
            .unwrap();
        let before = backend.load().await.unwrap();

        backend.fail_saves(true);
        let err = store
            .record_event("u", EventKind::Message, "t2", "second")
            .await
            .unwrap_err();
        assert!(err.is_persistence());

        assert_eq!(backend.load().await.unwrap(), before);
        // The in-memory store does hold the mutation.
        assert_eq!(store.get("u").await.unwrap().counter(Counter::Messages), 2);
    }

    #[tokio::test]
    async fn test_concurrent_writers_are_serialized() {
        let (store, backend) = open_store().await;
        let mut handles = Vec::new();
        for worker in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                for i in 0..10 {
                    store
                        .record_event("shared", EventKind::Message, &format!("w{worker}-{i}"), "")
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let record = store.get("shared").await.unwrap();
        assert_eq!(record.counter(Counter::Messages), 80);
        assert_eq!(record.event_log.len(), 80);
        let durable = backend.load().await.unwrap();
        assert_eq!(durable.get("shared").unwrap().counters.messages, 80);
    }
}
