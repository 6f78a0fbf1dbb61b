//! Config validation: schema checks with user-friendly error messages.

use crate::schema::{StoreBackendKind, TrackerConfig};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the parts every command needs: store, logging, queries.
pub fn validate(config: &TrackerConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_store(config, &mut report);
    validate_logging(config, &mut report);
    validate_queries(config, &mut report);
    report
}

/// [`validate`] plus the Discord connection settings needed to serve.
pub fn validate_for_serving(config: &TrackerConfig) -> ValidationReport {
    let mut report = validate(config);
    validate_discord(config, &mut report);
    report
}

fn validate_discord(config: &TrackerConfig, report: &mut ValidationReport) {
    if config.discord_token().is_none() {
        report.error("discord.token", "A bot token is required (set DISCORD_TOKEN)");
    }
    let raw_guild = config.discord.as_ref().and_then(|d| d.guild_id.as_deref());
    match (raw_guild, config.guild_id()) {
        (None, _) => report.error("discord.guildId", "A guild id is required (set GUILD_ID)"),
        (Some(raw), None) => report.error(
            "discord.guildId",
            format!("Guild id '{raw}' is not a number"),
        ),
        (Some(_), Some(0)) => report.error("discord.guildId", "Guild id cannot be 0"),
        _ => {}
    }
}

fn validate_store(config: &TrackerConfig, report: &mut ValidationReport) {
    let path = config.store_path();
    if path.trim().is_empty() && config.store_backend() != StoreBackendKind::Memory {
        report.error("store.path", "Store path cannot be empty");
    }
    if config.store_backend() == StoreBackendKind::Memory {
        report.warn("store.backend", "Memory backend keeps nothing across restarts");
    }
    let explicit_backups = config.store.as_ref().and_then(|s| s.backups).unwrap_or(0);
    if config.store_backend() == StoreBackendKind::Sqlite && explicit_backups > 0 {
        report.warn("store.backups", "Backups only apply to the json backend");
    }
}

fn validate_logging(config: &TrackerConfig, report: &mut ValidationReport) {
    if config.log_level().trim().is_empty() {
        report.error("logging.level", "Log level cannot be empty");
    }
    if let Some(dir) = config.log_dir() {
        if dir.trim().is_empty() {
            report.error("logging.dir", "Log directory cannot be empty when set");
        }
    }
}

fn validate_queries(config: &TrackerConfig, report: &mut ValidationReport) {
    if config.top_n() == 0 {
        report.warn("queries.topN", "topN is 0; server rankings will be empty");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::{DiscordConfig, QueriesConfig, StoreConfig};

    #[test]
    fn defaults_are_valid() {
        let cfg = apply_all_defaults(TrackerConfig::default());
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn serving_requires_discord_settings() {
        let cfg = apply_all_defaults(TrackerConfig::default());
        let report = validate_for_serving(&cfg);
        assert!(!report.is_valid());
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"discord.token"));
        assert!(paths.contains(&"discord.guildId"));
    }

    #[test]
    fn rejects_non_numeric_guild() {
        let mut cfg = TrackerConfig::default();
        cfg.discord = Some(DiscordConfig {
            token: Some("tok".into()),
            guild_id: Some("my-server".into()),
            ..Default::default()
        });
        let report = validate_for_serving(&cfg);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.contains("my-server"));
    }

    #[test]
    fn empty_store_path_is_an_error() {
        let mut cfg = TrackerConfig::default();
        cfg.store = Some(StoreConfig {
            path: Some("  ".into()),
            ..Default::default()
        });
        assert!(!validate(&cfg).is_valid());
    }

    #[test]
    fn sqlite_defaults_do_not_warn_about_backups() {
        let mut cfg = TrackerConfig::default();
        cfg.store = Some(StoreConfig {
            backend: Some(StoreBackendKind::Sqlite),
            ..Default::default()
        });
        let report = validate(&apply_all_defaults(cfg));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn explicit_sqlite_backups_warn() {
        let mut cfg = TrackerConfig::default();
        cfg.store = Some(StoreConfig {
            backend: Some(StoreBackendKind::Sqlite),
            backups: Some(2),
            ..Default::default()
        });
        let report = validate(&apply_all_defaults(cfg));
        assert_eq!(report.warnings[0].path, "store.backups");
    }

    #[test]
    fn zero_top_n_warns() {
        let mut cfg = TrackerConfig::default();
        cfg.queries = Some(QueriesConfig { top_n: Some(0) });
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings[0].path, "queries.topN");
    }
}
