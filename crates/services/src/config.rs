use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the quiz backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    request_timeout: Duration,
}

impl ClientConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute http(s) url.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url)?;
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("0".into()));
        }
        Ok(Self {
            base_url,
            request_timeout,
        })
    }

    /// Reads `QUIZ_API_BASE` and `QUIZ_API_TIMEOUT_SECS`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = lookup("QUIZ_API_BASE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout = match lookup("QUIZ_API_TIMEOUT_SECS") {
            Some(raw) => parse_timeout_secs(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        Self::new(&base, timeout)
    }

    #[must_use]
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        if !request_timeout.is_zero() {
            self.request_timeout = request_timeout;
        }
        self
    }

    /// Base url, always ending in `/` so relative endpoint paths keep any prefix.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Parses a timeout given in whole seconds.
///
/// # Errors
///
/// Returns `ConfigError::InvalidTimeout` for non-numeric or zero values.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_owned())),
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&normalized).map_err(|source| ConfigError::InvalidBaseUrl {
        raw: raw.to_owned(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(raw.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url().as_str(), "http://localhost:8080/");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn base_url_keeps_path_prefix() {
        let config = ClientConfig::new("https://quiz.example.com/backend", Duration::from_secs(5))
            .unwrap();
        let joined = config.base_url().join("api/quiz/topics").unwrap();
        assert_eq!(joined.as_str(), "https://quiz.example.com/backend/api/quiz/topics");
    }

    #[test]
    fn env_values_are_validated() {
        let err = ClientConfig::from_lookup(|key| match key {
            "QUIZ_API_TIMEOUT_SECS" => Some("0".into()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));

        let err = ClientConfig::from_lookup(|key| match key {
            "QUIZ_API_BASE" => Some("ftp://files".into()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(_)));

        let err = ClientConfig::from_lookup(|key| match key {
            "QUIZ_API_BASE" => Some("not a url".into()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn with_timeout_ignores_zero() {
        let config = ClientConfig::new(DEFAULT_BASE_URL, Duration::from_secs(30))
            .unwrap()
            .with_timeout(Duration::ZERO);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
