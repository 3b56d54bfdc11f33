//! Session configuration: API origin, request timeout, revalidation cadence.
//!
//! Native front ends read these from the environment; the browser build
//! bakes them in at compile time via `option_env!` with the same names.

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_REVALIDATE_INTERVAL_SECS: u64 = 60 * 60;

pub const ENV_API_BASE_URL: &str = "STORAIGE_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "STORAIGE_REQUEST_TIMEOUT_SECS";
pub const ENV_REVALIDATE_INTERVAL_SECS: &str = "STORAIGE_REVALIDATE_INTERVAL_SECS";

/// Errors produced while building a [`SessionConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The base URL is empty or not an http(s) origin.
    #[error("invalid API base URL: {0:?}")]
    InvalidBaseUrl(String),

    /// A duration setting was zero.
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Origin every auth endpoint path is appended to, without trailing `/`.
    pub base_url: String,
    /// Upper bound on a single request, after which the transport aborts it.
    pub request_timeout: Duration,
    /// Delay between background profile checks while authenticated.
    pub revalidate_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            revalidate_interval: Duration::from_secs(DEFAULT_REVALIDATE_INTERVAL_SECS),
        }
    }
}

impl SessionConfig {
    /// Build a config from process environment variables.
    ///
    /// Optional:
    /// - `STORAIGE_API_BASE_URL`: default `http://localhost:8080`
    /// - `STORAIGE_REQUEST_TIMEOUT_SECS`: default 15
    /// - `STORAIGE_REVALIDATE_INTERVAL_SECS`: default 3600
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the base URL is not an http(s) origin or a
    /// duration is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(e) => {
                log::warn!("config: ignoring {key}: {e}");
                None
            }
        })
    }

    /// Build a config from an arbitrary key lookup (environment, compile-time
    /// constants, test fixtures).
    ///
    /// # Errors
    ///
    /// See [`SessionConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_API_BASE_URL).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let request_secs = parse_secs(lookup(ENV_REQUEST_TIMEOUT_SECS).as_deref(), DEFAULT_REQUEST_TIMEOUT_SECS);
        let revalidate_secs =
            parse_secs(lookup(ENV_REVALIDATE_INTERVAL_SECS).as_deref(), DEFAULT_REVALIDATE_INTERVAL_SECS);

        Self::default()
            .with_base_url(&base_url)?
            .with_request_timeout(Duration::from_secs(request_secs))?
            .with_revalidate_interval(Duration::from_secs(revalidate_secs))
    }

    /// Replace the base URL, trimming surrounding whitespace and trailing `/`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] unless the URL starts with
    /// `http://` or `https://` and has a host part.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(raw)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDuration`] for a zero timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("request timeout"));
        }
        self.request_timeout = timeout;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDuration`] for a zero interval.
    pub fn with_revalidate_interval(mut self, interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroDuration("revalidate interval"));
        }
        self.revalidate_interval = interval;
        Ok(self)
    }

    /// Join the base URL with an endpoint path such as `/api/auth/login`.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn parse_secs(raw: Option<&str>, default: u64) -> u64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) => secs,
        Err(e) => {
            log::warn!("config: invalid seconds value {raw:?} ({e}), using {default}");
            default
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match host {
        Some(h) if !h.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
