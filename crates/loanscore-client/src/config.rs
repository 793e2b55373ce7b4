//! Client configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable overriding the service base URL.
pub const API_URL_ENV_VAR: &str = "LOANSCORE_API_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "LOANSCORE_TIMEOUT_SECS";

/// Default service base URL.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How credentials are sent to the login endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginEncoding {
    /// `{"username": ..., "password": ...}` body.
    #[default]
    Json,
    /// `application/x-www-form-urlencoded` body.
    Form,
}

impl LoginEncoding {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Form => "form",
        }
    }
}

impl fmt::Display for LoginEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Connection settings for the scoring service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash.
    pub base_url: String,
    pub timeout: Duration,
    pub login_encoding: LoginEncoding,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            login_encoding: LoginEncoding::default(),
            user_agent: format!("loanscore/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `LOANSCORE_API_URL` and `LOANSCORE_TIMEOUT_SECS`.
    ///
    /// An unparsable timeout is ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV_VAR)
            && !url.trim().is_empty()
        {
            config = config.with_base_url(url);
        }
        if let Ok(raw) = std::env::var(TIMEOUT_ENV_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "ignoring invalid {TIMEOUT_ENV_VAR}"),
            }
        }
        config
    }

    /// Set the base URL. Trailing slashes are removed.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_login_encoding(mut self, encoding: LoginEncoding) -> Self {
        self.login_encoding = encoding;
        self
    }

    /// Absolute URL of an endpoint path such as `/predict`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_cleanly() {
        let config = ClientConfig::default().with_base_url("http://svc:5000/ ");
        assert_eq!(config.base_url, "http://svc:5000");
        assert_eq!(config.endpoint("/predict"), "http://svc:5000/predict");
        assert_eq!(config.endpoint("users/me"), "http://svc:5000/users/me");
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.login_encoding, LoginEncoding::Json);
        assert!(config.user_agent.starts_with("loanscore/"));
    }
}
