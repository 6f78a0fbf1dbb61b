//! Activity tracker configuration schema.
//!
//! Every field is optional in the file; [`crate::defaults`] fills the gaps
//! and the accessors below fall back to the same defaults.

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_LOG_LEVEL, DEFAULT_STORE_BACKUPS, DEFAULT_STORE_PATH, DEFAULT_TOP_N,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
    /// Chat platform connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<DiscordConfig>,

    /// Where and how the record store is persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Summary query settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queries: Option<QueriesConfig>,
}

// ---------------------------------------------------------------------------
// Discord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Kept as text so `${GUILD_ID}` substitution works; parsed on use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,

    /// Post join/leave notices to the guild system channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announce_membership: Option<bool>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    #[default]
    Json,
    Sqlite,
    /// Nothing survives a restart; for trials and tests.
    Memory,
}

impl std::str::FromStr for StoreBackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StoreBackendKind::Json),
            "sqlite" => Ok(StoreBackendKind::Sqlite),
            "memory" => Ok(StoreBackendKind::Memory),
            other => anyhow::bail!("unknown store backend '{other}' (expected json, sqlite or memory)"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<StoreBackendKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Rolling backups kept by the JSON backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backups: Option<usize>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for rotated JSON logs; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Scrub tokens and phone numbers from logged message content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redact_content: Option<bool>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueriesConfig {
    /// Default length of server rankings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl TrackerConfig {
    pub fn discord_token(&self) -> Option<&str> {
        self.discord
            .as_ref()
            .and_then(|d| d.token.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    /// Guild id, if configured and numeric.
    pub fn guild_id(&self) -> Option<u64> {
        self.discord
            .as_ref()
            .and_then(|d| d.guild_id.as_deref())
            .and_then(|id| id.trim().parse().ok())
    }

    pub fn announce_membership(&self) -> bool {
        self.discord
            .as_ref()
            .and_then(|d| d.announce_membership)
            .unwrap_or(true)
    }

    pub fn store_backend(&self) -> StoreBackendKind {
        self.store
            .as_ref()
            .and_then(|s| s.backend)
            .unwrap_or_default()
    }

    pub fn store_path(&self) -> &str {
        self.store
            .as_ref()
            .and_then(|s| s.path.as_deref())
            .unwrap_or(DEFAULT_STORE_PATH)
    }

    pub fn store_backups(&self) -> usize {
        self.store
            .as_ref()
            .and_then(|s| s.backups)
            .unwrap_or(DEFAULT_STORE_BACKUPS)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }

    pub fn redact_content(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.redact_content)
            .unwrap_or(true)
    }

    pub fn top_n(&self) -> usize {
        self.queries
            .as_ref()
            .and_then(|q| q.top_n)
            .unwrap_or(DEFAULT_TOP_N)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_camel_case_yaml() {
        let yaml = r#"
discord:
  token: abc
  guildId: "42"
  announceMembership: false
store:
  backend: sqlite
  path: /var/lib/tracker/activity.db
queries:
  topN: 3
"#;
        let cfg: TrackerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.discord_token(), Some("abc"));
        assert_eq!(cfg.guild_id(), Some(42));
        assert!(!cfg.announce_membership());
        assert_eq!(cfg.store_backend(), StoreBackendKind::Sqlite);
        assert_eq!(cfg.store_path(), "/var/lib/tracker/activity.db");
        assert_eq!(cfg.top_n(), 3);
    }

    #[test]
    fn test_accessors_fall_back_to_defaults() {
        let cfg = TrackerConfig::default();
        assert_eq!(cfg.discord_token(), None);
        assert_eq!(cfg.store_backend(), StoreBackendKind::Json);
        assert_eq!(cfg.store_path(), DEFAULT_STORE_PATH);
        assert_eq!(cfg.log_level(), DEFAULT_LOG_LEVEL);
        assert_eq!(cfg.top_n(), DEFAULT_TOP_N);
        assert!(cfg.redact_content());
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("SQLite".parse::<StoreBackendKind>().unwrap(), StoreBackendKind::Sqlite);
        assert!("redis".parse::<StoreBackendKind>().is_err());
    }
}
