use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, error, info};
use tracker_core::{TrackerError, UserRecord};

use crate::backend::SnapshotBackend;
use crate::snapshot::Snapshot;

/// The activity store: one record per user, persisted as a whole on every
/// mutation.
///
/// Mutations hold the write lock across lookup, mutate and persist, so at
/// most one is in flight. Readers take the read lock and never observe a
/// half-applied mutation.
pub struct RecordStore {
    pub(crate) state: RwLock<Snapshot>,
    backend: Arc<dyn SnapshotBackend>,
}

impl RecordStore {
    /// Build the store from the backend's last saved snapshot.
    pub async fn open(backend: Arc<dyn SnapshotBackend>) -> Result<Self, TrackerError> {
        let snapshot = backend.load().await?;
        info!(
            backend = backend.name(),
            records = snapshot.len(),
            "Record store opened"
        );
        Ok(Self {
            state: RwLock::new(snapshot),
            backend,
        })
    }

    /// Create a record for `user_id` unless one exists, then persist.
    ///
    /// Returns `true` when a record was created. An existing record is left
    /// untouched and nothing is persisted.
    pub async fn create(
        &self,
        user_id: &str,
        invited_by: &str,
        created_at: &str,
    ) -> Result<bool, TrackerError> {
        if user_id.trim().is_empty() {
            return Err(TrackerError::Validation("user id is empty".to_string()));
        }

        let mut state = self.state.write().await;
        if state.contains(user_id) {
            debug!(user_id = %user_id, "Record already exists; skipping creation");
            return Ok(false);
        }

        state.insert(UserRecord::new(user_id, invited_by, created_at));
        info!(user_id = %user_id, invited_by = %invited_by, "Created user record");
        self.persist(&state).await?;
        Ok(true)
    }

    /// Exact-match lookup.
    pub async fn get(&self, user_id: &str) -> Option<UserRecord> {
        self.state.read().await.get(user_id).cloned()
    }

    /// Every user id, in insertion order.
    pub async fn all_ids(&self) -> Vec<String> {
        self.state.read().await.ids()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.is_empty()
    }

    /// A consistent copy of the whole store.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }

    /// Final persist before the process exits.
    pub async fn shutdown(&self) -> Result<(), TrackerError> {
        let state = self.state.read().await;
        self.persist(&state).await?;
        info!(records = state.len(), "Record store flushed on shutdown");
        Ok(())
    }

    /// Write the full snapshot through the backend.
    ///
    /// Callers hold the state lock, so the saved snapshot is never a
    /// half-applied mutation.
    pub(crate) async fn persist(&self, snapshot: &Snapshot) -> Result<(), TrackerError> {
        self.backend.save(snapshot).await.map_err(|e| {
            error!(backend = self.backend.name(), error = %e, "Failed to persist store");
            match e {
                TrackerError::Persistence(_) => e,
                other => TrackerError::Persistence(other.to_string()),
            }
        })
    }
}
