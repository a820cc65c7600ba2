//! Client configuration
//!
//! Resolves each setting CLI → environment → TOML → compiled default, using
//! the loaders in `classyfire_common::config`.

use crate::error::Result;
use crate::models::{EmptyClassificationPolicy, FailurePolicy};
use crate::services::transport::{CLASSYFIRE_URL, USER_AGENT};
use classyfire_common::config::{
    default_cache_dir, env_value, resolve_cache_dir, TomlConfig, ENV_SLEEP, ENV_TIMEOUT, ENV_URL,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default spacing between requests: 12 requests per minute
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(5);

/// Default delay before the retry pass
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub min_interval: Duration,
    pub retry_delay: Duration,
    pub empty_policy: EmptyClassificationPolicy,
    pub failure_policy: FailurePolicy,
    pub user_agent: String,
    pub cache_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: CLASSYFIRE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            min_interval: DEFAULT_MIN_INTERVAL,
            retry_delay: DEFAULT_RETRY_DELAY,
            empty_policy: EmptyClassificationPolicy::default(),
            failure_policy: FailurePolicy::default(),
            user_agent: USER_AGENT.to_string(),
            cache_dir: default_cache_dir(),
        }
    }
}

/// Settings given on the command line (highest priority)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub sleep_secs: Option<u64>,
    pub retry_delay_secs: Option<u64>,
    pub on_empty: Option<String>,
    pub on_error: Option<String>,
    pub cache_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Resolve the configuration from all tiers
    ///
    /// # Errors
    /// `Config` when a policy string is not recognized.
    pub fn resolve(overrides: &ConfigOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let defaults = ClientConfig::default();

        let base_url = overrides
            .base_url
            .clone()
            .or_else(|| env_value::<String>(ENV_URL))
            .or_else(|| toml_config.base_url.clone())
            .unwrap_or(defaults.base_url);

        let timeout = overrides
            .timeout_secs
            .or_else(|| env_value(ENV_TIMEOUT))
            .or(toml_config.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let min_interval = overrides
            .sleep_secs
            .or_else(|| env_value(ENV_SLEEP))
            .or(toml_config.sleep_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.min_interval);

        let retry_delay = overrides
            .retry_delay_secs
            .or(toml_config.retry_delay_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.retry_delay);

        let empty_policy = match overrides.on_empty.as_ref().or(toml_config.on_empty.as_ref()) {
            Some(raw) => raw.parse()?,
            None => defaults.empty_policy,
        };

        let failure_policy = match overrides.on_error.as_ref().or(toml_config.on_error.as_ref()) {
            Some(raw) => raw.parse()?,
            None => defaults.failure_policy,
        };

        let user_agent = toml_config
            .user_agent
            .clone()
            .unwrap_or(defaults.user_agent);

        let cache_dir = resolve_cache_dir(overrides.cache_dir.as_deref(), toml_config);

        let config = Self {
            base_url,
            timeout,
            min_interval,
            retry_delay,
            empty_policy,
            failure_policy,
            user_agent,
            cache_dir,
        };
        debug!(?config, "Resolved client configuration");
        Ok(config)
    }
}
