//! `serve`: run the Discord adapter until Ctrl-C, then flush the store.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracker_channels::{ChannelAdapter, DiscordAdapter, DiscordSettings};
use tracker_commands::build_dispatcher;
use tracker_config::TrackerConfig;

use crate::app::build_service;

pub async fn run(config: &TrackerConfig) -> Result<()> {
    let settings = DiscordSettings {
        token: config.discord_token().context("No Discord token configured")?.to_string(),
        guild_id: config.guild_id().context("No guild id configured")?,
        announce_membership: config.announce_membership(),
    };

    let service = build_service(config).await?;
    let store = service.store().clone();
    let dispatcher = Arc::new(build_dispatcher(service.clone()));
    let adapter = DiscordAdapter::new(settings, service, dispatcher);

    info!(adapter = adapter.name(), "Activity tracker running");
    let outcome = tokio::select! {
        result = adapter.start() => result,
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Shutdown requested");
            Ok(())
        }
    };

    if let Err(e) = store.shutdown().await {
        error!(error = %e, "Final persist failed");
        return Err(e.into());
    }
    info!("Store flushed");
    outcome
}
