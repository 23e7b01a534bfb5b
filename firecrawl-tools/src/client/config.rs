//! Client configuration and credentials.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "FIRECRAWL_API_KEY";

/// Environment variable overriding the service base URL.
pub const API_URL_ENV: &str = "FIRECRAWL_API_URL";

/// Base URL of the hosted service.
pub const HOSTED_API_URL: &str = "https://api.firecrawl.dev";

/// Connection settings for the Firecrawl service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the service.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout in seconds. `None` waits indefinitely.
    #[serde(default)]
    pub request_timeout_seconds: Option<f64>,
    /// Delay between crawl status checks in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: f64,
}

fn default_api_url() -> String {
    HOSTED_API_URL.to_string()
}

fn default_poll_interval() -> f64 {
    2.0
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_seconds: None,
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration pointing at the hosted service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the base URL from `FIRECRAWL_API_URL`, falling back to the hosted service.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::default().with_api_url(url),
            _ => Self::default(),
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, seconds: f64) -> Self {
        self.request_timeout_seconds = Some(seconds);
        self
    }

    /// Sets the crawl poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, seconds: f64) -> Self {
        self.poll_interval_seconds = seconds;
        self
    }

    /// Whether the configuration targets the hosted service, which requires an API key.
    #[must_use]
    pub fn is_hosted(&self) -> bool {
        self.api_url.trim_end_matches('/') == HOSTED_API_URL
    }

    /// Gets the request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds
            .filter(|s| s.is_finite() && *s > 0.0)
            .map(Duration::from_secs_f64)
    }

    /// Gets the poll interval as a Duration.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        if self.poll_interval_seconds.is_finite() && self.poll_interval_seconds > 0.0 {
            Duration::from_secs_f64(self.poll_interval_seconds)
        } else {
            Duration::ZERO
        }
    }
}

/// The API key used to authenticate with the service.
///
/// The key is never printed by `Debug`.
#[derive(Default)]
pub struct Credentials {
    api_key: Option<SecretBox<String>>,
}

impl Credentials {
    /// Credentials carrying no key.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Credentials carrying the given key.
    #[must_use]
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretBox::new(Box::new(key.into()))),
        }
    }

    /// Uses the explicit key when given, otherwise `FIRECRAWL_API_KEY`.
    ///
    /// Blank keys count as absent.
    #[must_use]
    pub fn resolve(explicit: Option<String>) -> Self {
        let key = explicit
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var(API_KEY_ENV)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            });

        match key {
            Some(key) => Self::with_key(key),
            None => Self::none(),
        }
    }

    /// Whether a key is present.
    #[must_use]
    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub(crate) fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|key| key.expose_secret().as_str())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();

        assert_eq!(config.api_url, "https://api.firecrawl.dev");
        assert!(config.request_timeout().is_none());
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert!(config.is_hosted());
    }

    #[test]
    fn test_config_deserialize_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_url": "http://localhost:3002"}"#).unwrap();

        assert_eq!(config.api_url, "http://localhost:3002");
        assert!((config.poll_interval_seconds - 2.0).abs() < f64::EPSILON);
        assert!(!config.is_hosted());
    }

    #[test]
    fn test_hosted_detection_ignores_trailing_slash() {
        assert!(ClientConfig::new()
            .with_api_url("https://api.firecrawl.dev/")
            .is_hosted());
    }

    #[test]
    fn test_request_timeout_ignores_non_positive() {
        assert!(ClientConfig::new()
            .with_request_timeout(0.0)
            .request_timeout()
            .is_none());
        assert_eq!(
            ClientConfig::new().with_request_timeout(1.5).request_timeout(),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_explicit_key_wins() {
        let credentials = Credentials::resolve(Some("fc-explicit".to_string()));

        assert!(credentials.has_key());
        assert_eq!(credentials.api_key(), Some("fc-explicit"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", Credentials::with_key("fc-secret"));

        assert!(!rendered.contains("fc-secret"));
        assert!(rendered.contains("REDACTED"));
    }
}
