//! Upstream connection settings.
//!
//! Settings are resolved once at startup and handed to the proxies by value;
//! nothing in the request path reads the process environment.

use crate::error::ConfigError;
use crate::http_client::HttpAuth;

pub const ENV_UPSTREAM_URL: &str = "STOCKPAGE_UPSTREAM_URL";
pub const ENV_API_KEY: &str = "STOCKPAGE_API_KEY";
pub const ENV_TIMEOUT_MS: &str = "STOCKPAGE_TIMEOUT_MS";

pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8080";

/// Header name the upstream checks; sent with this exact casing.
pub const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    base_url: String,
    api_key: Option<String>,
    timeout_ms: Option<u64>,
}

impl UpstreamConfig {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: validate_base_url(base_url.as_ref())?,
            api_key: None,
            timeout_ms: None,
        })
    }

    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        self.base_url = validate_base_url(base_url.as_ref())?;
        Ok(self)
    }

    /// Empty keys are treated as absent so the header is omitted.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms.filter(|timeout| *timeout > 0);
        self
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_UPSTREAM_URL)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| String::from(DEFAULT_UPSTREAM_URL));

        let timeout_ms = match lookup(ENV_TIMEOUT_MS).filter(|value| !value.trim().is_empty()) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        Ok(Self::new(base_url)?
            .with_api_key(lookup(ENV_API_KEY))
            .with_timeout_ms(timeout_ms))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub const fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }

    pub fn auth(&self) -> HttpAuth {
        match &self.api_key {
            Some(key) => HttpAuth::Header {
                name: String::from(API_KEY_HEADER),
                value: key.clone(),
            },
            None => HttpAuth::None,
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Parse a timeout given in milliseconds.
pub fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|timeout| *timeout > 0)
        .ok_or_else(|| ConfigError::InvalidTimeout {
            value: raw.to_owned(),
        })
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());

    if !has_scheme || !has_host {
        return Err(ConfigError::InvalidBaseUrl {
            value: raw.to_owned(),
        });
    }

    Ok(trimmed.to_owned())
}
