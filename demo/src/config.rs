//! Runtime configuration, read once from the environment.

use std::time::Duration;

use rickmorty_core::DEFAULT_BASE_URL;
use thiserror::Error;

pub const BASE_URL_VAR: &str = "RICKMORTY_API_URL";
pub const TIMEOUT_VAR: &str = "RICKMORTY_TIMEOUT_SECS";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("RICKMORTY_API_URL must be an http(s) URL, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("RICKMORTY_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    /// Upper bound on a whole request, connect through body.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = read(BASE_URL_VAR) {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidBaseUrl(url.to_string()));
            }
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(secs) = read(TIMEOUT_VAR) {
            config.timeout = match secs.trim().parse::<u64>() {
                Ok(n) if n > 0 => Duration::from_secs(n),
                _ => return Err(ConfigError::InvalidTimeout(secs)),
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])).unwrap(), Config::default());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[(BASE_URL_VAR, "  "), (TIMEOUT_VAR, "")])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://127.0.0.1:3000/api/"),
            (TIMEOUT_VAR, "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_non_http_url() {
        let err = Config::from_lookup(lookup(&[(BASE_URL_VAR, "ftp://example")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidBaseUrl("ftp://example".to_string()));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Config::from_lookup(lookup(&[(TIMEOUT_VAR, "0")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("0".to_string()));
    }
}
