/// Command registry: the activity summary commands.
use crate::types::{ArgType, CommandArg, CommandDef};

pub const USER_ACTIVITY: &str = "get-user-activity";
pub const SERVER_ACTIVITY: &str = "get-server-activity";

fn arg(name: &str, description: &str, ty: ArgType, required: bool) -> CommandArg {
    CommandArg {
        name: name.to_string(),
        description: description.to_string(),
        arg_type: ty,
        required,
    }
}

/// Build the built-in command list.
pub fn builtin_commands() -> Vec<CommandDef> {
    vec![
        CommandDef {
            key: USER_ACTIVITY.into(),
            description: "Get a user's activity summary".into(),
            text_aliases: vec!["/get-user-activity".into(), "/activity".into()],
            args: vec![arg("user", "Member to summarize", ArgType::User, true)],
        },
        CommandDef {
            key: SERVER_ACTIVITY.into(),
            description: "Check last server activity".into(),
            text_aliases: vec!["/get-server-activity".into(), "/leaderboard".into()],
            args: vec![arg("limit", "How many members to rank", ArgType::Integer, false)],
        },
    ]
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub struct CommandRegistry {
    commands: Vec<CommandDef>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: builtin_commands() }
    }

    pub fn all(&self) -> &[CommandDef] {
        &self.commands
    }

    /// Find a command by slash-text alias (e.g. "/leaderboard").
    pub fn find_by_alias(&self, alias: &str) -> Option<&CommandDef> {
        let lower = alias.to_lowercase();
        self.commands.iter().find(|c| {
            c.text_aliases.iter().any(|a| a.to_lowercase() == lower)
        })
    }

    /// Find a command by its key.
    pub fn find_by_key(&self, key: &str) -> Option<&CommandDef> {
        self.commands.iter().find(|c| c.key == key)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_alias_and_key() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.find_by_alias("/LEADERBOARD").unwrap().key, SERVER_ACTIVITY);
        assert_eq!(registry.find_by_key(USER_ACTIVITY).unwrap().primary_alias(), "/get-user-activity");
        assert!(registry.find_by_alias("/help").is_none());
    }

    #[test]
    fn test_user_arg_is_required() {
        let registry = CommandRegistry::new();
        let def = registry.find_by_key(USER_ACTIVITY).unwrap();
        assert!(def.args[0].required);
        assert_eq!(def.args[0].arg_type, ArgType::User);
    }
}
