/// Text command detection: identify /commands typed into a channel.
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

/// Detect a command at the start of a message string.
/// Returns `None` if it's a normal message.
pub fn detect_command(text: &str, registry: &CommandRegistry) -> Option<CommandInvocation> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    // Find the first whitespace to split alias from args
    let (alias_part, rest) = trimmed
        .split_once(|c: char| c.is_whitespace())
        .map(|(a, r)| (a, r.trim()))
        .unwrap_or((trimmed, ""));

    let def = registry.find_by_alias(alias_part)?;
    let args = parse_args(rest, def.args.len());

    Some(CommandInvocation::new(def.key.clone(), args))
}

/// One whitespace-separated token per declared arg; the last arg takes the rest.
fn parse_args(text: &str, arity: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut remaining = text.trim();

    for i in 0..arity {
        if remaining.is_empty() {
            break;
        }
        if i == arity - 1 {
            result.push(remaining.to_string());
            break;
        }
        let (token, rest) = remaining
            .split_once(|c: char| c.is_whitespace())
            .map(|(t, r)| (t, r.trim()))
            .unwrap_or((remaining, ""));
        result.push(token.to_string());
        remaining = rest;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{SERVER_ACTIVITY, USER_ACTIVITY};

    #[test]
    fn detects_command_with_arg() {
        let registry = CommandRegistry::new();
        let inv = detect_command("  /activity  some user ", &registry).unwrap();
        assert_eq!(inv.key, USER_ACTIVITY);
        assert_eq!(inv.args, vec!["some user"]);
    }

    #[test]
    fn detects_command_without_args() {
        let registry = CommandRegistry::new();
        let inv = detect_command("/get-server-activity", &registry).unwrap();
        assert_eq!(inv.key, SERVER_ACTIVITY);
        assert!(inv.args.is_empty());
        assert_eq!(inv.arg(0), None);
    }

    #[test]
    fn ignores_plain_text_and_unknown_commands() {
        let registry = CommandRegistry::new();
        assert!(detect_command("hello there", &registry).is_none());
        assert!(detect_command("/shrug", &registry).is_none());
    }
}
