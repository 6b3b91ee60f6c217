//! Application configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top key by key,
//! so a config file only needs the values it wants to change.
//!
//! This is *deployment* configuration (where the store lives, where templates
//! live, whether development mode is on). The admin-editable site defaults
//! live in the store as a [`SiteSetting`](crate::models::SiteSetting) row.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! store_path = "portfolio.json"   # Persisted configuration store
//! template_dir = "templates"      # Root of the template tree
//! debug = false                   # Development mode (preview override, variant review)
//!
//! [logging]
//! filter = "portfolio_layout=info"   # Used when RUST_LOG is unset
//!
//! [homepage]
//! featured_projects = 3           # Used when no SiteSetting row exists
//! featured_category_blocks = 3
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::models::SiteSetting;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Path of the persisted store, relative to the config root.
    pub store_path: String,
    /// Root of the template tree, relative to the config root.
    pub template_dir: String,
    /// Development mode. Enables `?profile=` style preview overrides and the
    /// variant review listing; both are inert when this is off.
    pub debug: bool,
    pub logging: LoggingConfig,
    pub homepage: HomepageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: "portfolio.json".to_string(),
            template_dir: "templates".to_string(),
            debug: false,
            logging: LoggingConfig::default(),
            homepage: HomepageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store_path must not be empty".into(),
            ));
        }
        if self.template_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "template_dir must not be empty".into(),
            ));
        }
        if self.homepage.featured_projects == 0 {
            return Err(ConfigError::Validation(
                "homepage.featured_projects must be at least 1".into(),
            ));
        }
        if self.homepage.featured_category_blocks == 0 {
            return Err(ConfigError::Validation(
                "homepage.featured_category_blocks must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Store path resolved against the config root.
    pub fn store_path_in(&self, root: &Path) -> PathBuf {
        root.join(&self.store_path)
    }

    /// Template directory resolved against the config root.
    pub fn template_dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.template_dir)
    }

    /// Built-in site settings carrying this config's homepage limits, for a
    /// store that has no `SiteSetting` row yet.
    pub fn fallback_site_setting(&self) -> SiteSetting {
        SiteSetting {
            homepage_featured_projects_count: self.homepage.featured_projects,
            homepage_featured_category_blocks_count: self.homepage.featured_category_blocks,
            ..SiteSetting::default()
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing-subscriber` env-filter directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "portfolio_layout=info".to_string(),
        }
    }
}

/// Homepage limits used when the store has no `SiteSetting` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomepageConfig {
    pub featured_projects: u32,
    pub featured_category_blocks: u32,
}

impl Default for HomepageConfig {
    fn default() -> Self {
        Self {
            featured_projects: 3,
            featured_category_blocks: 3,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Portfolio Layout Configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Site-wide theme, colors and layout profiles are edited through the admin
# commands and persisted in the store file, not here.

# Persisted configuration store (SiteSetting, layout profiles, categories,
# resumes, image presets, navigation). Relative to this file.
store_path = "portfolio.json"

# Template tree root. Page templates live under portfolio/, with theme
# overrides in portfolio/<theme>/ and variants in portfolio/variants/<variant>/.
template_dir = "templates"

# Development mode. Enables the preview override (--profile <slug>) and the
# variant-review listing. Both are ignored when this is false.
debug = false

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# tracing-subscriber filter directive. RUST_LOG takes precedence when set.
filter = "portfolio_layout=info"

# ---------------------------------------------------------------------------
# Homepage fallbacks (used only when no SiteSetting row exists yet)
# ---------------------------------------------------------------------------
[homepage]
featured_projects = 3
featured_category_blocks = 3
"##
}
