//! Offline commands against the configured store: `user`, `top`, `record`.

use anyhow::{Context, Result};
use tracker_commands::{render_server_activity, render_user_activity, ActivityService};
use tracker_core::{local_timestamp, EventKind};

pub async fn user(service: &ActivityService, user_id: &str, json: bool) -> Result<String> {
    let activity = service.on_query_user(user_id).await;
    if json {
        return serde_json::to_string_pretty(&activity).context("Failed to serialize activity");
    }
    Ok(render_user_activity(&activity, user_id))
}

pub async fn top(service: &ActivityService, limit: Option<usize>, json: bool) -> Result<String> {
    let activity = service.on_query_server(limit).await;
    if json {
        return serde_json::to_string_pretty(&activity).context("Failed to serialize rankings");
    }
    Ok(render_server_activity(&activity))
}

pub async fn record(
    service: &ActivityService,
    user_id: &str,
    kind: &str,
    timestamp: Option<String>,
    content: &str,
) -> Result<String> {
    let kind: EventKind = kind.parse()?;
    let timestamp = timestamp.unwrap_or_else(local_timestamp);
    let recorded = service.on_event(user_id, kind, &timestamp, content).await?;

    let mut out = format!("Recorded {kind} for {user_id} at {timestamp}");
    if recorded.created {
        out.push_str(" (new record)");
    }
    if let Some((counter, value)) = recorded.counter {
        out.push_str(&format!("; {counter} = {value}"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracker_store::{MemoryBackend, RecordStore, SnapshotBackend};

    async fn service() -> ActivityService {
        let backend: Arc<dyn SnapshotBackend> = Arc::new(MemoryBackend::new());
        ActivityService::new(Arc::new(RecordStore::open(backend).await.unwrap()), 10)
    }

    #[tokio::test]
    async fn record_then_report() {
        let svc = service().await;
        let line = record(&svc, "alice", "message", Some("2024-01-01 09:00:00".into()), "hi")
            .await
            .unwrap();
        assert_eq!(
            line,
            "Recorded Message for alice at 2024-01-01 09:00:00 (new record); messages = 1"
        );

        let text = user(&svc, "alice", false).await.unwrap();
        assert!(text.contains("Last Message Sent:        2024-01-01 09:00:00"));

        let json = top(&svc, Some(5), true).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["by_messages"][0][0], "alice");
    }

    #[tokio::test]
    async fn record_rejects_unknown_kind() {
        let svc = service().await;
        assert!(record(&svc, "alice", "wave", None, "").await.is_err());
        assert!(svc.store().is_empty().await);
    }
}
