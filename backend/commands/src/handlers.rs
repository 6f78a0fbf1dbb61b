/// Activity command handlers.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::dispatch::{CommandContext, CommandHandler, CommandResponse};
use crate::render::{render_server_activity, render_user_activity};
use crate::service::ActivityService;
use crate::types::CommandInvocation;

// ---------------------------------------------------------------------------
// /get-user-activity
// ---------------------------------------------------------------------------

pub struct UserActivityHandler {
    pub service: Arc<ActivityService>,
}

#[async_trait]
impl CommandHandler for UserActivityHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse> {
        let Some(user) = inv.arg(0) else {
            return Ok(CommandResponse::ephemeral("Usage: /get-user-activity <user>"));
        };
        let activity = self.service.on_query_user(user).await;
        let display = ctx.target_mention.as_deref().unwrap_or(user);
        Ok(CommandResponse::ok(render_user_activity(&activity, display)))
    }
}

// ---------------------------------------------------------------------------
// /get-server-activity
// ---------------------------------------------------------------------------

pub struct ServerActivityHandler {
    pub service: Arc<ActivityService>,
}

#[async_trait]
impl CommandHandler for ServerActivityHandler {
    async fn handle(&self, _ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse> {
        let limit = match inv.arg(0) {
            None => None,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(n) if n > 0 => Some(n as usize),
                Ok(_) => None,
                Err(_) => {
                    return Ok(CommandResponse::ephemeral(format!(
                        "'{raw}' is not a number; usage: /get-server-activity [limit]"
                    )))
                }
            },
        };
        let activity = self.service.on_query_server(limit).await;
        Ok(CommandResponse::ok(render_server_activity(&activity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_dispatcher;
    use crate::registry::{SERVER_ACTIVITY, USER_ACTIVITY};
    use tracker_core::EventKind;
    use tracker_store::{MemoryBackend, RecordStore, SnapshotBackend};

    async fn service() -> Arc<ActivityService> {
        let backend: Arc<dyn SnapshotBackend> = Arc::new(MemoryBackend::new());
        let store = Arc::new(RecordStore::open(backend).await.unwrap());
        Arc::new(ActivityService::new(store, 10))
    }

    #[tokio::test]
    async fn user_activity_uses_mention_when_given() {
        let svc = service().await;
        svc.on_event("alice", EventKind::Message, "2024-01-01 09:00:00", "hi").await.unwrap();
        let dispatcher = build_dispatcher(svc);

        let ctx = CommandContext::new("general", "bob").with_target_mention("<@1>");
        let inv = CommandInvocation::new(USER_ACTIVITY, vec!["alice".into()]);
        let resp = dispatcher.dispatch(&ctx, &inv).await.unwrap();
        assert!(!resp.ephemeral);
        assert!(resp.text.starts_with("User <@1> Activity Summary:"));
        assert!(resp.text.contains("Total Messages Sent:      1"));
    }

    #[tokio::test]
    async fn user_activity_requires_a_user() {
        let dispatcher = build_dispatcher(service().await);
        let inv = CommandInvocation::new(USER_ACTIVITY, vec![]);
        let resp = dispatcher.dispatch(&CommandContext::default(), &inv).await.unwrap();
        assert!(resp.ephemeral);
    }

    #[tokio::test]
    async fn server_activity_honours_limit() {
        let svc = service().await;
        for (user, n) in [("a", 3), ("b", 2), ("c", 1)] {
            for _ in 0..n {
                svc.on_event(user, EventKind::Message, "2024-01-01 09:00:00", "x").await.unwrap();
            }
        }
        let dispatcher = build_dispatcher(svc);
        let inv = CommandInvocation::new(SERVER_ACTIVITY, vec!["2".into()]);
        let resp = dispatcher.dispatch(&CommandContext::default(), &inv).await.unwrap();
        assert!(resp.text.contains("a: 3 messages"));
        assert!(resp.text.contains("b: 2 messages"));
        assert!(!resp.text.contains("c: 1 messages"));
    }

    #[tokio::test]
    async fn server_activity_rejects_bad_limit() {
        let dispatcher = build_dispatcher(service().await);
        let inv = CommandInvocation::new(SERVER_ACTIVITY, vec!["lots".into()]);
        let resp = dispatcher.dispatch(&CommandContext::default(), &inv).await.unwrap();
        assert!(resp.ephemeral);
    }

    #[tokio::test]
    async fn unknown_command_is_reported() {
        let dispatcher = build_dispatcher(service().await);
        let inv = CommandInvocation::new("nope", vec![]);
        let resp = dispatcher.dispatch(&CommandContext::default(), &inv).await.unwrap();
        assert!(resp.text.contains("/nope"));
    }
}
