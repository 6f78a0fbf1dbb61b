//! Discord Slash Commands
//!
//! Builds the guild application commands from the registry and maps
//! interaction options, and mentions in typed commands, back onto positional
//! command arguments.

use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::CommandOptionType;
use tracker_commands::{ArgType, CommandDef, CommandInvocation, CommandRegistry};

fn option_type(arg_type: ArgType) -> CommandOptionType {
    match arg_type {
        ArgType::User => CommandOptionType::User,
        ArgType::Integer => CommandOptionType::Integer,
    }
}

fn create_command(def: &CommandDef) -> CreateCommand {
    def.args.iter().fold(
        CreateCommand::new(&def.key).description(&def.description),
        |command, arg| {
            command.add_option(
                CreateCommandOption::new(option_type(arg.arg_type), &arg.name, &arg.description)
                    .required(arg.required),
            )
        },
    )
}

/// Every registered command as a guild slash command.
pub fn slash_commands(registry: &CommandRegistry) -> Vec<CreateCommand> {
    registry.all().iter().map(create_command).collect()
}

/// Place named option values in the order `def` declares its args.
///
/// Options the user left out become empty strings so later args keep their
/// position; unknown option names are dropped.
pub fn invocation_from_options(def: &CommandDef, provided: &[(String, String)]) -> CommandInvocation {
    let mut args: Vec<String> = def
        .args
        .iter()
        .map(|arg| {
            provided
                .iter()
                .find(|(name, _)| *name == arg.name)
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        })
        .collect();
    while args.last().is_some_and(|a| a.is_empty()) {
        args.pop();
    }
    CommandInvocation::new(def.key.clone(), args)
}

/// User id inside a `<@id>` or `<@!id>` mention.
pub fn parse_user_mention(text: &str) -> Option<u64> {
    let inner = text.trim().strip_prefix("<@")?.strip_suffix('>')?;
    inner.strip_prefix('!').unwrap_or(inner).parse().ok()
}

/// Swap mention arguments of `User` type for the mentioned member's name.
///
/// `mentions` pairs each user id mentioned in the message with its name.
/// Returns the mention text of the last resolved member, for display.
pub fn resolve_text_mentions(
    def: &CommandDef,
    mut inv: CommandInvocation,
    mentions: &[(u64, String)],
) -> (CommandInvocation, Option<String>) {
    let mut target = None;
    for (arg, value) in def.args.iter().zip(inv.args.iter_mut()) {
        if arg.arg_type != ArgType::User {
            continue;
        }
        let Some(id) = parse_user_mention(value) else { continue };
        if let Some((_, name)) = mentions.iter().find(|(mentioned, _)| *mentioned == id) {
            target = Some(format!("<@{id}>"));
            *value = name.clone();
        }
    }
    (inv, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracker_commands::{
        build_dispatcher, detect_command, ActivityService, CommandContext, SERVER_ACTIVITY,
        USER_ACTIVITY,
    };
    use tracker_core::EventKind;
    use tracker_store::{MemoryBackend, RecordStore, SnapshotBackend};

    #[test]
    fn builds_one_command_per_definition() {
        let registry = CommandRegistry::new();
        assert_eq!(slash_commands(&registry).len(), registry.all().len());
    }

    #[test]
    fn maps_named_options_to_positions() {
        let registry = CommandRegistry::new();
        let def = registry.find_by_key(USER_ACTIVITY).unwrap();
        let inv = invocation_from_options(
            def,
            &[("other".into(), "x".into()), ("user".into(), "alice".into())],
        );
        assert_eq!(inv.key, USER_ACTIVITY);
        assert_eq!(inv.args, vec!["alice"]);
    }

    #[test]
    fn missing_optional_arg_is_dropped() {
        let registry = CommandRegistry::new();
        let def = registry.find_by_key(SERVER_ACTIVITY).unwrap();
        let inv = invocation_from_options(def, &[]);
        assert!(inv.args.is_empty());
    }

    #[test]
    fn parses_both_mention_forms() {
        assert_eq!(parse_user_mention("<@42>"), Some(42));
        assert_eq!(parse_user_mention(" <@!42> "), Some(42));
        assert_eq!(parse_user_mention("alice"), None);
        assert_eq!(parse_user_mention("<@&7>"), None);
    }

    #[test]
    fn unmatched_mention_is_left_alone() {
        let registry = CommandRegistry::new();
        let def = registry.find_by_key(USER_ACTIVITY).unwrap();
        let inv = CommandInvocation::new(USER_ACTIVITY, vec!["<@9>".into()]);
        let (inv, target) = resolve_text_mentions(def, inv, &[(42, "alice".into())]);
        assert_eq!(inv.args, vec!["<@9>"]);
        assert!(target.is_none());
    }

    #[tokio::test]
    async fn typed_mention_reports_the_mentioned_member() {
        let backend: Arc<dyn SnapshotBackend> = Arc::new(MemoryBackend::new());
        let store = Arc::new(RecordStore::open(backend).await.unwrap());
        let service = Arc::new(ActivityService::new(store, 10));
        for _ in 0..3 {
            service
                .on_event("alice", EventKind::Message, "2024-01-01 09:00:00", "hi")
                .await
                .unwrap();
        }

        let registry = CommandRegistry::new();
        let inv = detect_command("/activity <@42>", &registry).unwrap();
        let def = registry.find_by_key(&inv.key).unwrap();
        let (inv, target) = resolve_text_mentions(def, inv, &[(42, "alice".into())]);
        assert_eq!(inv.args, vec!["alice"]);

        let ctx = CommandContext::new("general", "bob").with_target_mention(target.unwrap());
        let resp = build_dispatcher(service).dispatch(&ctx, &inv).await.unwrap();
        assert!(resp.text.starts_with("User <@42> Activity Summary:"));
        assert!(resp.text.contains("Total Messages Sent:      3"));
    }
}
