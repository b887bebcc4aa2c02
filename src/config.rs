//! Runtime configuration loaded from the environment

use std::path::PathBuf;
use std::time::Duration;

use figment::providers::Env;
use figment::Figment;
use serde::Deserialize;

use crate::data::clist::CLIST_BASE_URL;

/// Application configuration
///
/// Every field maps to the upper-cased environment variable of the same
/// name, e.g. `clist_key` is read from `CLIST_KEY`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// API key sent upstream as `Authorization: ApiKey <key>`
    pub clist_key: String,
    /// Contest endpoint of the listing API
    #[serde(default = "default_clist_url")]
    pub clist_url: String,
    /// Redis connection string; the file store is used when unset
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Directory for the file store, overriding the XDG cache dir
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Seconds a refreshed listing stays cached
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Seconds before the upstream request is abandoned
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Collapse concurrent cache misses into one upstream fetch
    #[serde(default)]
    pub coalesce_misses: bool,
    /// Log level for this crate's targets
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_clist_url() -> String {
    CLIST_BASE_URL.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Loads the configuration from the process environment
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(Figment::new().merge(Env::raw()))
    }

    /// Extracts the configuration from an arbitrary figment
    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_with_only_key() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("CLIST_KEY", "user:abc123");

            let config = Config::load()?;
            assert_eq!(config.clist_key, "user:abc123");
            assert_eq!(config.clist_url, CLIST_BASE_URL);
            assert!(config.redis_url.is_none());
            assert!(config.cache_dir.is_none());
            assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
            assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
            assert!(!config.coalesce_misses);
            assert_eq!(config.log_level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_overrides_from_env() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("CLIST_KEY", "k");
            jail.set_env("REDIS_URL", "redis://127.0.0.1:6379/");
            jail.set_env("CACHE_TTL_SECS", "120");
            jail.set_env("FETCH_TIMEOUT_SECS", "3");
            jail.set_env("COALESCE_MISSES", "true");
            jail.set_env("LOG_LEVEL", "debug");

            let config = Config::load()?;
            assert_eq!(config.redis_url.as_deref(), Some("redis://127.0.0.1:6379/"));
            assert_eq!(config.cache_ttl(), Duration::from_secs(120));
            assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
            assert!(config.coalesce_misses);
            assert_eq!(config.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn test_missing_key_is_an_error() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            assert!(Config::load().is_err());
            Ok(())
        });
    }
}
