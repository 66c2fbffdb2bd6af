//! Configuration file loading with precedence handling.

use crate::model::AlignmentMode;
use crate::sync::{EligibilityPolicy, SyncOptions};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// Read a mode name the same way `--mode` and `SYNCSCROLL_MODE` do.
fn deserialize_mode<'de, D>(deserializer: D) -> Result<Option<AlignmentMode>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| raw.parse().map_err(serde::de::Error::custom))
        .transpose()
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/syncscroll/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Mode used when no persisted state applies ("normal", "offset", "off", any case).
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub default_mode: Option<AlignmentMode>,

    /// Debounce window for scroll bursts, in milliseconds.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    /// View schemes that never take part in sync.
    #[serde(default)]
    pub excluded_schemes: Option<Vec<String>>,

    /// Restore the on/off state across restarts.
    #[serde(default)]
    pub remember_toggle_state: Option<bool>,

    /// Mirror the leader's selection into followers.
    #[serde(default)]
    pub highlight_selections: Option<bool>,

    /// Directory holding per-workspace state files.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Key binding overrides as `action = "key"` pairs.
    #[serde(default)]
    pub keybindings: Option<toml::Value>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Mode used when no persisted state applies.
    pub default_mode: AlignmentMode,
    /// Debounce window in milliseconds.
    pub debounce_ms: u64,
    /// Schemes excluded from sync.
    pub excluded_schemes: Vec<String>,
    /// Restore on/off state across restarts.
    pub remember_toggle_state: bool,
    /// Mirror selections into followers.
    pub highlight_selections: bool,
    /// Directory holding per-workspace state.
    pub state_dir: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Raw `[keybindings]` table, applied by [`KeyBindings::with_overrides`](crate::config::KeyBindings::with_overrides).
    pub keybindings: Option<toml::Value>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            default_mode: AlignmentMode::Normal,
            debounce_ms: 0,
            excluded_schemes: vec!["output".to_string(), "debug".to_string()],
            remember_toggle_state: true,
            highlight_selections: true,
            state_dir: default_state_dir(),
            log_file_path: default_log_path(),
            keybindings: None,
        }
    }
}

impl ResolvedConfig {
    /// Engine options derived from this configuration.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            default_mode: self.default_mode,
            remember_toggle_state: self.remember_toggle_state,
            debounce: Duration::from_millis(self.debounce_ms),
            highlight_selections: self.highlight_selections,
            eligibility: EligibilityPolicy::new(self.excluded_schemes.iter().cloned()),
        }
    }
}

/// Resolve default state directory.
///
/// Returns `~/.local/state/syncscroll` on Unix-like systems, or the local
/// data directory elsewhere. Falls back to `.syncscroll` in the current directory.
pub fn default_state_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("syncscroll"))
        .unwrap_or_else(|| PathBuf::from(".syncscroll"))
}

/// Resolve default log file path.
///
/// Returns `<state dir>/syncscroll.log`.
pub fn default_log_path() -> PathBuf {
    default_state_dir().join("syncscroll.log")
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/syncscroll/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("syncscroll").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SYNCSCROLL_CONFIG` environment variable
/// 3. Default path `~/.config/syncscroll/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("SYNCSCROLL_CONFIG") {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(
                "SYNCSCROLL_CONFIG is set but empty".to_string(),
            ));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let state_dir = config.state_dir.unwrap_or(defaults.state_dir);
    // A custom state dir moves the default log along with it.
    let log_file_path = config
        .log_file_path
        .unwrap_or_else(|| state_dir.join("syncscroll.log"));

    ResolvedConfig {
        default_mode: config.default_mode.unwrap_or(defaults.default_mode),
        debounce_ms: config.debounce_ms.unwrap_or(defaults.debounce_ms),
        excluded_schemes: config.excluded_schemes.unwrap_or(defaults.excluded_schemes),
        remember_toggle_state: config
            .remember_toggle_state
            .unwrap_or(defaults.remember_toggle_state),
        highlight_selections: config
            .highlight_selections
            .unwrap_or(defaults.highlight_selections),
        state_dir,
        log_file_path,
        keybindings: config.keybindings,
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `SYNCSCROLL_MODE`: Override default mode
/// - `SYNCSCROLL_DEBOUNCE_MS`: Override debounce window
///
/// Unparseable values are ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(mode) = std::env::var("SYNCSCROLL_MODE")
        .ok()
        .and_then(|raw| raw.parse().ok())
    {
        config.default_mode = mode;
    }

    if let Some(ms) = std::env::var("SYNCSCROLL_DEBOUNCE_MS")
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
    {
        config.debounce_ms = ms;
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    mode_override: Option<AlignmentMode>,
    debounce_override: Option<u64>,
) -> ResolvedConfig {
    if let Some(mode) = mode_override {
        config.default_mode = mode;
        // An explicit mode on the command line beats whatever was persisted.
        config.remember_toggle_state = false;
    }

    if let Some(ms) = debounce_override {
        config.debounce_ms = ms;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
