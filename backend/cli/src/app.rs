//! Wiring from a prepared config to a running store and service.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracker_commands::ActivityService;
use tracker_config::{StoreBackendKind, TrackerConfig};
use tracker_store::{JsonFileBackend, MemoryBackend, RecordStore, SnapshotBackend, SqliteBackend};

/// Build the snapshot backend named by the config.
pub fn build_backend(config: &TrackerConfig) -> Result<Arc<dyn SnapshotBackend>> {
    let path = config.store_path();
    let backend: Arc<dyn SnapshotBackend> = match config.store_backend() {
        StoreBackendKind::Json => {
            Arc::new(JsonFileBackend::new(path).with_backups(config.store_backups()))
        }
        StoreBackendKind::Sqlite => {
            if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create store directory: {}", parent.display())
                })?;
            }
            Arc::new(SqliteBackend::open(path).context("Failed to open SQLite store")?)
        }
        StoreBackendKind::Memory => Arc::new(MemoryBackend::new()),
    };
    info!(backend = backend.name(), path = %path, "Store backend selected");
    Ok(backend)
}

pub async fn open_store(config: &TrackerConfig) -> Result<Arc<RecordStore>> {
    let backend = build_backend(config)?;
    let store = RecordStore::open(backend)
        .await
        .context("Failed to load the activity store")?;
    Ok(Arc::new(store))
}

pub async fn build_service(config: &TrackerConfig) -> Result<Arc<ActivityService>> {
    let store = open_store(config).await?;
    Ok(Arc::new(
        ActivityService::new(store, config.top_n()).with_redaction(config.redact_content()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracker_config::apply_all_defaults;
    use tracker_config::schema::StoreConfig;
    use tracker_core::EventKind;

    fn config(backend: StoreBackendKind, path: &Path) -> TrackerConfig {
        let mut cfg = TrackerConfig::default();
        cfg.store = Some(StoreConfig {
            backend: Some(backend),
            path: Some(path.display().to_string()),
            ..Default::default()
        });
        apply_all_defaults(cfg)
    }

    #[tokio::test]
    async fn json_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let cfg = config(StoreBackendKind::Json, &dir.path().join("activity.json"));

        let service = build_service(&cfg).await.unwrap();
        service.on_event("alice", EventKind::Message, "2024-01-01 09:00:00", "hi").await.unwrap();
        drop(service);

        let service = build_service(&cfg).await.unwrap();
        assert_eq!(service.on_query_user("alice").await.messages, 1);
    }

    #[tokio::test]
    async fn sqlite_store_creates_parent_dir() {
        let dir = TempDir::new().unwrap();
        let cfg = config(StoreBackendKind::Sqlite, &dir.path().join("nested/activity.db"));

        let store = open_store(&cfg).await.unwrap();
        store.create("bob", "unknown", "2024-01-01 09:00:00").await.unwrap();
        drop(store);

        let store = open_store(&cfg).await.unwrap();
        assert!(store.get("bob").await.is_some());
    }

    #[tokio::test]
    async fn memory_backend_starts_empty() {
        let dir = TempDir::new().unwrap();
        let cfg = config(StoreBackendKind::Memory, &dir.path().join("unused"));
        assert!(open_store(&cfg).await.unwrap().is_empty().await);
    }
}
