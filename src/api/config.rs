//! Purpose: Connection settings for the HTTP transport.
//! Exports: `ApiConfig`, env var names, `DEFAULT_API_URL`.
//! Role: One place where token, base URL and timeout are resolved (flags > env > defaults).
//! Invariants: The token is never included in `Debug` output.

use crate::core::error::{Error, ErrorKind};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org/";
pub const TOKEN_ENV: &str = "BOTSCHEMA_TOKEN";
pub const API_URL_ENV: &str = "BOTSCHEMA_API_URL";
pub const TIMEOUT_ENV: &str = "BOTSCHEMA_TIMEOUT_MS";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let token = lookup(TOKEN_ENV)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                Error::new(ErrorKind::Usage)
                    .with_message("bot token is not configured")
                    .with_hint(format!("Set {TOKEN_ENV} or pass --token."))
            })?;
        let mut config = Self::new(token.trim());
        if let Some(base_url) = lookup(API_URL_ENV) {
            config = config.with_base_url(base_url);
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let millis = raw.trim().parse::<u64>().map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!("{TIMEOUT_ENV} must be a whole number of milliseconds"))
                    .with_source(err)
            })?;
            config = config.with_timeout(Duration::from_millis(millis));
        }
        Ok(config)
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{API_URL_ENV, ApiConfig, DEFAULT_API_URL, TIMEOUT_ENV, TOKEN_ENV};
    use crate::core::error::ErrorKind;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_values_override_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[
            (TOKEN_ENV, " 123:abc "),
            (API_URL_ENV, "http://127.0.0.1:8081"),
            (TIMEOUT_ENV, "1500"),
        ]))
        .expect("config");
        assert_eq!(config.token, "123:abc");
        assert_eq!(config.base_url, "http://127.0.0.1:8081");
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn defaults_apply_without_optional_vars() {
        let config = ApiConfig::from_lookup(lookup(&[(TOKEN_ENV, "t")])).expect("config");
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_token_is_usage_error() {
        let err = ApiConfig::from_lookup(lookup(&[])).expect_err("token");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.hint().unwrap_or_default().contains(TOKEN_ENV));

        let err = ApiConfig::from_lookup(lookup(&[(TOKEN_ENV, "t"), (TIMEOUT_ENV, "soon")]))
            .expect_err("timeout");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn debug_redacts_token() {
        let text = format!("{:?}", ApiConfig::new("secret-token"));
        assert!(!text.contains("secret-token"));
    }
}
