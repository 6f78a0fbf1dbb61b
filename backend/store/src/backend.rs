use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracker_core::TrackerError;

use crate::snapshot::Snapshot;

/// Durable storage for whole-store snapshots.
///
/// `save` must be atomic from the store's point of view: after a failed save
/// a subsequent `load` returns the previously saved snapshot.
#[async_trait]
pub trait SnapshotBackend: Send + Sync {
    /// Human-readable backend name for logging.
    fn name(&self) -> &str;

    /// Read the last saved snapshot. An empty store when nothing was saved yet.
    async fn load(&self) -> Result<Snapshot, TrackerError>;

    /// Replace the durable snapshot with `snapshot`.
    async fn save(&self, snapshot: &Snapshot) -> Result<(), TrackerError>;
}

/// Process-local backend for tests and dry runs.
///
/// `fail_saves(true)` makes every subsequent save fail without touching the
/// held snapshot.
#[derive(Default)]
pub struct MemoryBackend {
    saved: Mutex<Snapshot>,
    failing: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already populated snapshot.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            saved: Mutex::new(snapshot),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail_saves(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl SnapshotBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> Result<Snapshot, TrackerError> {
        Ok(self.saved.lock().await.clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), TrackerError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TrackerError::Persistence(
                "memory backend configured to fail".to_string(),
            ));
        }
        *self.saved.lock().await = snapshot.clone();
        Ok(())
    }
}
