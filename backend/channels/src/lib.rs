use async_trait::async_trait;

pub mod discord;
pub mod discord_slash;
pub mod discord_voice;

pub use discord::{DiscordAdapter, DiscordSettings};

/// All channel adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Run the adapter's connection until it stops or fails.
    async fn start(&self) -> anyhow::Result<()>;
}
