//! JSON snapshot file with atomic replace and rolling backups.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info, warn};
use tracker_core::TrackerError;

use crate::backend::SnapshotBackend;
use crate::snapshot::Snapshot;

pub struct JsonFileBackend {
    path: PathBuf,
    /// Number of rolling `.bak.N` copies kept next to the snapshot.
    backups: usize,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backups: 0,
        }
    }

    pub fn with_backups(mut self, backups: usize) -> Self {
        self.backups = backups;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Shift `snapshot.bak.1` → `.bak.2` → ... and copy the current file to `.bak.1`.
    async fn rotate_backups(&self) {
        for i in (1..self.backups).rev() {
            let old = self.sibling(&format!(".bak.{i}"));
            let new = self.sibling(&format!(".bak.{}", i + 1));
            if old.exists() {
                if let Err(e) = fs::rename(&old, &new).await {
                    warn!("Failed to rotate backup {}: {}", old.display(), e);
                }
            }
        }

        let bak = self.sibling(".bak.1");
        if let Err(e) = fs::copy(&self.path, &bak).await {
            warn!("Failed to create backup {}: {}", bak.display(), e);
        }
    }
}

fn io_error(action: &str, path: &Path, err: impl std::fmt::Display) -> TrackerError {
    TrackerError::Persistence(format!("failed to {action} {}: {err}", path.display()))
}

#[async_trait]
impl SnapshotBackend for JsonFileBackend {
    fn name(&self) -> &str {
        "json"
    }

    async fn load(&self) -> Result<Snapshot, TrackerError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Snapshot file does not exist; starting empty");
            return Ok(Snapshot::new());
        }

        let raw = fs::read(&self.path)
            .await
            .map_err(|e| io_error("read snapshot", &self.path, e))?;
        let snapshot: Snapshot = serde_json::from_slice(&raw)
            .map_err(|e| io_error("parse snapshot", &self.path, e))?;

        info!(path = %self.path.display(), records = snapshot.len(), "Loaded snapshot");
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), TrackerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create directory", parent, e))?;
        }

        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| io_error("serialize snapshot for", &self.path, e))?;

        if self.backups > 0 && self.path.exists() {
            self.rotate_backups().await;
        }

        // Write to temp file, then rename for atomicity.
        let tmp_path = self.sibling(".tmp");
        fs::write(&tmp_path, &json)
            .await
            .map_err(|e| io_error("write", &tmp_path, e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| io_error("replace", &self.path, e))?;

        debug!(path = %self.path.display(), bytes = json.len(), "Saved snapshot");
        Ok(())
    }
}
