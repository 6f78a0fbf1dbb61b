//! Config defaults: applies sensible default values to parsed config.

use crate::schema::{LoggingConfig, QueriesConfig, StoreBackendKind, StoreConfig, TrackerConfig};

/// Default snapshot file, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "user_activity.json";

/// Default number of rolling snapshot backups.
pub const DEFAULT_STORE_BACKUPS: usize = 3;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default server ranking length.
pub const DEFAULT_TOP_N: usize = 10;

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: TrackerConfig) -> TrackerConfig {
    let config = apply_store_defaults(config);
    let config = apply_logging_defaults(config);
    apply_query_defaults(config)
}

fn apply_store_defaults(mut config: TrackerConfig) -> TrackerConfig {
    let store = config.store.get_or_insert_with(StoreConfig::default);
    if store.backend.is_none() {
        store.backend = Some(Default::default());
    }
    if store.path.is_none() {
        store.path = Some(DEFAULT_STORE_PATH.to_string());
    }
    // Only the json backend keeps backup files.
    if store.backups.is_none() && store.backend == Some(StoreBackendKind::Json) {
        store.backups = Some(DEFAULT_STORE_BACKUPS);
    }
    config
}

fn apply_logging_defaults(mut config: TrackerConfig) -> TrackerConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.redact_content.is_none() {
        logging.redact_content = Some(true);
    }
    config
}

fn apply_query_defaults(mut config: TrackerConfig) -> TrackerConfig {
    let queries = config.queries.get_or_insert_with(QueriesConfig::default);
    if queries.top_n.is_none() {
        queries.top_n = Some(DEFAULT_TOP_N);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_store_defaults() {
        let cfg = apply_all_defaults(TrackerConfig::default());
        let store = cfg.store.unwrap();
        assert_eq!(store.backend, Some(StoreBackendKind::Json));
        assert_eq!(store.path.as_deref(), Some(DEFAULT_STORE_PATH));
        assert_eq!(store.backups, Some(DEFAULT_STORE_BACKUPS));
    }

    #[test]
    fn sqlite_gets_no_backup_default() {
        let mut cfg = TrackerConfig::default();
        cfg.store = Some(StoreConfig {
            backend: Some(StoreBackendKind::Sqlite),
            ..Default::default()
        });
        let store = apply_all_defaults(cfg).store.unwrap();
        assert_eq!(store.backups, None);
        assert_eq!(store.path.as_deref(), Some(DEFAULT_STORE_PATH));
    }

    #[test]
    fn does_not_override_user_values() {
        let mut cfg = TrackerConfig::default();
        cfg.queries = Some(QueriesConfig { top_n: Some(3) });
        cfg.logging = Some(LoggingConfig {
            level: Some("debug".to_string()),
            ..Default::default()
        });
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.top_n(), 3);
        assert_eq!(cfg.log_level(), "debug");
        assert!(cfg.redact_content());
    }
}
