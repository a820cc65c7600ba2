//! Configuration loading and cache folder resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is never an error. A malformed one is reported and
//! the remaining tiers are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Environment variable overriding the cache folder
pub const ENV_CACHE_DIR: &str = "CLASSYFIRE_CACHE_DIR";
/// Environment variable overriding the request timeout (seconds)
pub const ENV_TIMEOUT: &str = "CLASSYFIRE_TIMEOUT";
/// Environment variable overriding the minimum spacing between requests (seconds)
pub const ENV_SLEEP: &str = "CLASSYFIRE_SLEEP";
/// Environment variable overriding the service base URL
pub const ENV_URL: &str = "CLASSYFIRE_URL";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; anything left out falls through to the
/// compiled defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TomlConfig {
    /// Folder holding the cache database
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// ClassyFire service base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Minimum spacing between two requests in seconds
    #[serde(default)]
    pub sleep_secs: Option<u64>,

    /// Delay before the retry pass in seconds
    #[serde(default)]
    pub retry_delay_secs: Option<u64>,

    /// Behavior on empty classification (`raise`, `retry-last`, `accept`)
    #[serde(default)]
    pub on_empty: Option<String>,

    /// Behavior on per-identifier request failure (`abort`, `skip`)
    #[serde(default)]
    pub on_error: Option<String>,

    /// User-Agent header sent with every request
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Default configuration file path for the platform
///
/// `~/.config/classyfire/config.toml` on Linux, the platform equivalent elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("classyfire").join("config.toml"))
}

/// Load a TOML configuration file
///
/// Returns the default configuration when the file does not exist.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the configuration file from its default location
///
/// Never fails: a broken file is logged and replaced by defaults.
pub fn load_default_toml_config() -> TomlConfig {
    let Some(path) = default_config_path() else {
        return TomlConfig::default();
    };

    match load_toml_config(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring config file: {}", e);
            TomlConfig::default()
        }
    }
}

/// OS-dependent default cache folder
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("classyfire"))
        .unwrap_or_else(|| PathBuf::from("./classyfire_cache"))
}

/// Resolve the cache folder following CLI → ENV → TOML → default
pub fn resolve_cache_dir(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ENV_CACHE_DIR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.cache_dir {
        return path.clone();
    }

    default_cache_dir()
}

/// Read and parse an environment variable
///
/// Unset variables yield `None`; unparsable values are logged and ignored.
pub fn env_value<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", name, raw, e);
            None
        }
    }
}
