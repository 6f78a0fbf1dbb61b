//! `tracker-config`: activity tracker configuration management.
//!
//! Provides:
//! - Typed config schema (discord, store, logging, queries)
//! - YAML read/write with atomic backup rotation
//! - `${ENV_VAR}` substitution and environment overrides
//! - Default value application
//! - Validation with per-field errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, apply_env_overrides_with, contains_env_var_reference, resolve_env_vars,
    resolve_env_vars_with, MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_config, load_raw, write_config};
pub use schema::{StoreBackendKind, TrackerConfig};
pub use validation::{validate, validate_for_serving, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load, substitute env vars, apply env overrides and defaults.
///
/// Nothing is validated yet, so a binary can install its logger from the
/// result before [`check`] reports findings.
pub async fn load_unchecked(path: &Path) -> Result<TrackerConfig> {
    let raw = load_raw(path).await?;
    let resolved = resolve_env_vars(&raw).context("Failed to resolve env vars in config")?;

    let config: TrackerConfig = serde_json::from_value(resolved)
        .context("Failed to deserialize config after processing")?;
    let config = apply_env_overrides(config)?;
    Ok(apply_all_defaults(config))
}

/// [`load_unchecked`] followed by [`validate`]. Warnings are logged; any
/// validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<TrackerConfig> {
    let config = load_unchecked(path).await?;
    check(&validate(&config))?;
    Ok(config)
}

/// Log every finding of `report` and fail if it holds errors.
pub fn check(report: &ValidationReport) -> Result<()> {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        bail!("{} config error(s); first: {}", report.errors.len(), first);
    }
    Ok(())
}
