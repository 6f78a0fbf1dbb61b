use std::sync::Arc;

use crate::discord_slash::{invocation_from_options, resolve_text_mentions, slash_commands};
use crate::discord_voice::{call_content, is_voice_join};
use crate::ChannelAdapter;
use async_trait::async_trait;
use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::model::application::{CommandDataOptionValue, CommandInteraction, Interaction};
use serenity::model::channel::Message as DiscordMessage;
use serenity::model::gateway::Ready;
use serenity::model::guild::Member;
use serenity::model::id::GuildId;
use serenity::model::user::User;
use serenity::model::voice::VoiceState;
use serenity::prelude::*;
use tracing::{debug, error, info, warn};
use tracker_commands::{
    detect_command, render_departure_notice, render_join_notice, ActivityService, CommandContext,
    CommandDispatcher, CommandRegistry, CommandResponse,
};
use tracker_core::{local_timestamp, EventKind};

/// Connection settings for one guild.
#[derive(Debug, Clone)]
pub struct DiscordSettings {
    pub token: String,
    pub guild_id: u64,
    /// Post join and departure notices in the guild's system channel.
    pub announce_membership: bool,
}

struct Handler {
    service: Arc<ActivityService>,
    dispatcher: Arc<CommandDispatcher>,
    registry: CommandRegistry,
    guild_id: GuildId,
    announce_membership: bool,
}

impl Handler {
    fn is_our_guild(&self, guild_id: Option<GuildId>) -> bool {
        guild_id == Some(self.guild_id)
    }

    async fn announce(&self, ctx: &Context, text: String) {
        if !self.announce_membership {
            return;
        }
        let guild = match self.guild_id.to_partial_guild(ctx).await {
            Ok(guild) => guild,
            Err(e) => {
                error!("Failed to fetch guild {}: {:?}", self.guild_id, e);
                return;
            }
        };
        let Some(channel) = guild.system_channel_id else {
            warn!(guild_id = %self.guild_id, "Guild has no system channel; notice dropped");
            return;
        };
        if let Err(e) = channel.say(&ctx.http, text).await {
            error!("Error sending notice: {:?}", e);
        }
    }

    async fn respond(&self, ctx: &Context, command: &CommandInteraction, response: CommandResponse) {
        let message = CreateInteractionResponseMessage::new()
            .content(response.text)
            .ephemeral(response.ephemeral);
        if let Err(e) = command
            .create_response(&ctx.http, CreateInteractionResponse::Message(message))
            .await
        {
            error!("Error responding to /{}: {:?}", command.data.name, e);
        }
    }

    async fn run_command(&self, ctx: &Context, command: &CommandInteraction) {
        let Some(def) = self.registry.find_by_key(&command.data.name) else {
            warn!(command = %command.data.name, "Interaction for unknown command");
            return;
        };

        let mut cmd_ctx = CommandContext::new(command.channel_id.to_string(), command.user.name.clone());
        let mut provided = Vec::new();
        for option in &command.data.options {
            let value = match &option.value {
                CommandDataOptionValue::User(user_id) => {
                    cmd_ctx = cmd_ctx.with_target_mention(format!("<@{user_id}>"));
                    match command.data.resolved.users.get(user_id) {
                        Some(user) => user.name.clone(),
                        None => match user_id.to_user(ctx).await {
                            Ok(user) => user.name,
                            Err(e) => {
                                warn!("Failed to resolve user {}: {:?}", user_id, e);
                                continue;
                            }
                        },
                    }
                }
                CommandDataOptionValue::Integer(n) => n.to_string(),
                CommandDataOptionValue::String(s) => s.clone(),
                other => {
                    debug!(option = %option.name, "Ignoring option value {:?}", other);
                    continue;
                }
            };
            provided.push((option.name.clone(), value));
        }

        let inv = invocation_from_options(def, &provided);
        let response = match self.dispatcher.dispatch(&cmd_ctx, &inv).await {
            Ok(response) => response,
            Err(e) => {
                error!(command = %inv.key, "Command failed: {:#}", e);
                CommandResponse::ephemeral("Something went wrong while reading activity.")
            }
        };
        self.respond(ctx, command, response).await;
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: DiscordMessage) {
        if msg.author.bot || !self.is_our_guild(msg.guild_id) || msg.content.trim().is_empty() {
            return;
        }

        let user = msg.author.name.as_str();
        info!(user_id = %user, channel_id = %msg.channel_id, "Message received");
        if let Err(e) = self
            .service
            .on_event(user, EventKind::Message, &local_timestamp(), &msg.content)
            .await
        {
            error!(user_id = %user, "Failed to record message: {}", e);
        }

        // Typed commands get the same answer as their slash form.
        if let Some(inv) = detect_command(&msg.content, &self.registry) {
            let mut cmd_ctx = CommandContext::new(msg.channel_id.to_string(), user);
            let inv = match self.registry.find_by_key(&inv.key) {
                Some(def) => {
                    let mentions: Vec<(u64, String)> = msg
                        .mentions
                        .iter()
                        .map(|u| (u.id.get(), u.name.clone()))
                        .collect();
                    let (inv, target) = resolve_text_mentions(def, inv, &mentions);
                    if let Some(mention) = target {
                        cmd_ctx = cmd_ctx.with_target_mention(mention);
                    }
                    inv
                }
                None => inv,
            };
            match self.dispatcher.dispatch(&cmd_ctx, &inv).await {
                Ok(response) => {
                    if let Err(e) = msg.channel_id.say(&ctx.http, response.text).await {
                        error!("Error sending message: {:?}", e);
                    }
                }
                Err(e) => error!(command = %inv.key, "Command failed: {:#}", e),
            }
        }
    }

    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        if !self.is_our_guild(new.guild_id) {
            return;
        }
        let before = old.as_ref().and_then(|s| s.channel_id).map(|c| c.get());
        let after = new.channel_id.map(|c| c.get());
        if !is_voice_join(before, after) {
            return;
        }

        let user = match &new.member {
            Some(member) => member.user.clone(),
            None => match new.user_id.to_user(&ctx).await {
                Ok(user) => user,
                Err(e) => {
                    warn!("Failed to resolve voice user {}: {:?}", new.user_id, e);
                    return;
                }
            },
        };
        if user.bot {
            return;
        }

        let Some(channel_id) = new.channel_id else { return };
        let channel_name = match channel_id.name(&ctx).await {
            Ok(name) => name,
            Err(e) => {
                warn!("Failed to resolve channel name {}: {:?}", channel_id, e);
                channel_id.to_string()
            }
        };

        info!(user_id = %user.name, channel = %channel_name, "Voice call joined");
        if let Err(e) = self
            .service
            .on_event(&user.name, EventKind::Call, &local_timestamp(), &call_content(&channel_name))
            .await
        {
            error!(user_id = %user.name, "Failed to record call: {}", e);
        }
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        if new_member.user.bot || !self.is_our_guild(Some(new_member.guild_id)) {
            return;
        }
        let user = new_member.user.name.as_str();
        info!(user_id = %user, "Member joined the server");

        if let Err(e) = self.service.on_member_join(user, &local_timestamp()).await {
            error!(user_id = %user, "Failed to record join: {}", e);
        }
        self.announce(&ctx, render_join_notice(user)).await;
    }

    async fn guild_member_removal(
        &self,
        ctx: Context,
        guild_id: GuildId,
        user: User,
        _member_data_if_available: Option<Member>,
    ) {
        if user.bot || !self.is_our_guild(Some(guild_id)) {
            return;
        }
        info!(user_id = %user.name, "Member left the server");

        match self.service.on_member_leave(&user.name, &local_timestamp()).await {
            Ok(departure) => self.announce(&ctx, render_departure_notice(&departure)).await,
            Err(e) => error!(user_id = %user.name, "Failed to record leave: {}", e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            info!(command = %command.data.name, invoker = %command.user.name, "Slash command invoked");
            self.run_command(&ctx, &command).await;
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
        match self
            .guild_id
            .set_commands(&ctx.http, slash_commands(&self.registry))
            .await
        {
            Ok(commands) => info!(guild_id = %self.guild_id, count = commands.len(), "Slash commands registered"),
            Err(e) => error!("Failed to register slash commands: {:?}", e),
        }
    }
}

pub struct DiscordAdapter {
    settings: DiscordSettings,
    service: Arc<ActivityService>,
    dispatcher: Arc<CommandDispatcher>,
}

impl DiscordAdapter {
    pub fn new(
        settings: DiscordSettings,
        service: Arc<ActivityService>,
        dispatcher: Arc<CommandDispatcher>,
    ) -> Self {
        Self {
            settings,
            service,
            dispatcher,
        }
    }
}

#[async_trait]
impl ChannelAdapter for DiscordAdapter {
    fn name(&self) -> &str { "discord" }

    async fn start(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.settings.guild_id != 0, "Guild id cannot be 0");
        info!(guild_id = self.settings.guild_id, "Starting Discord adapter");

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_VOICE_STATES
            | GatewayIntents::MESSAGE_CONTENT;

        let handler = Handler {
            service: self.service.clone(),
            dispatcher: self.dispatcher.clone(),
            registry: CommandRegistry::new(),
            guild_id: GuildId::new(self.settings.guild_id),
            announce_membership: self.settings.announce_membership,
        };

        let mut client = Client::builder(&self.settings.token, intents)
            .event_handler(handler)
            .await?;

        if let Err(why) = client.start().await {
            error!("Client error: {:?}", why);
            anyhow::bail!("Discord client error: {:?}", why);
        }

        Ok(())
    }
}
