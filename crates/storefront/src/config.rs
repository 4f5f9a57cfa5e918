//! Client configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const API_URL_ENV: &str = "PRICECOMPARE_API_URL";
pub const TIMEOUT_ENV: &str = "PRICECOMPARE_TIMEOUT_SECS";
pub const PREFS_DB_ENV: &str = "PRICECOMPARE_PREFS_DB";

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API URL {0:?}: must start with http:// or https://")]
    InvalidApiUrl(String),
    #[error("invalid timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),
    #[error("could not resolve a data directory for preferences; set PRICECOMPARE_PREFS_DB")]
    NoDataDir,
}

/// Where the storefront talks to and where it keeps local state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    /// Upper bound for every HTTP request.
    pub request_timeout: Duration,
    /// SQLite file backing the preference store.
    pub prefs_path: PathBuf,
}

impl StorefrontConfig {
    pub fn new(api_url: &str, request_timeout: Duration, prefs_path: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_api_url(api_url)?,
            request_timeout,
            prefs_path,
        })
    }

    /// Build from `PRICECOMPARE_*` variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup(API_URL_ENV).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout = match lookup(TIMEOUT_ENV) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };

        let prefs_path = match lookup(PREFS_DB_ENV) {
            Some(path) => PathBuf::from(path),
            None => default_prefs_path()?,
        };

        Self::new(&api_url, request_timeout, prefs_path)
    }

    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(api_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidApiUrl(raw.to_string()))
    }
}

/// `{data_dir}/pricecompare/preferences.db`.
fn default_prefs_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
        .ok_or(ConfigError::NoDataDir)?;
    Ok(base.join("pricecompare").join("preferences.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = StorefrontConfig::from_lookup(lookup(&[(PREFS_DB_ENV, "/tmp/p.db")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.prefs_path, PathBuf::from("/tmp/p.db"));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            (API_URL_ENV, "https://ceny.example.cz/"),
            (PREFS_DB_ENV, "/tmp/p.db"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://ceny.example.cz");
    }

    #[test]
    fn rejects_non_http_urls() {
        let err = StorefrontConfig::from_lookup(lookup(&[
            (API_URL_ENV, "ftp://example"),
            (PREFS_DB_ENV, "/tmp/p.db"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiUrl(_)));
    }

    #[test]
    fn rejects_zero_or_garbage_timeouts() {
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
        assert_eq!(parse_timeout(" 30 ").unwrap(), Duration::from_secs(30));
    }
}
