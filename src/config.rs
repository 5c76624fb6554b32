//! Client configuration with the TripIt defaults.

use std::time::Duration;

use url::Url;

use crate::error::TripItError;

pub const DEFAULT_BASE_URL: &str = "https://api.tripit.com/v1";
pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
/// Roughly three requests per second.
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(300);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for one client instance. Every field has a default and can be
/// overridden before the client is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root; endpoint paths are appended verbatim.
    pub base_url: String,
    /// Total attempts per call, including the first.
    pub max_retries: usize,
    /// Backoff before attempt `n + 1` is `base_delay * 2^n`.
    pub base_delay: Duration,
    pub min_request_interval: Duration,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("tripit-client/{}", env!("TRIPIT_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Checks the settings a client cannot work without.
    pub fn validate(&self) -> Result<(), TripItError> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            TripItError::InvalidConfig(format!("base URL '{}' is not absolute: {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TripItError::InvalidConfig(format!(
                "base URL '{}' must use http or https",
                self.base_url
            )));
        }
        if self.max_retries == 0 {
            return Err(TripItError::InvalidConfig(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(TripItError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute URL for an endpoint path such as `/list/trip?past=true`.
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.tripit.com/v1");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay, Duration::from_secs(1));
        assert_eq!(config.min_request_interval, Duration::from_millis(300));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("tripit-client/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:8080/v1")
            .with_max_retries(5)
            .with_base_delay(Duration::from_millis(10))
            .with_min_request_interval(Duration::ZERO)
            .with_timeout(Duration::from_secs(2))
            .with_user_agent("test-agent");

        assert_eq!(config.base_url, "http://127.0.0.1:8080/v1");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_delay, Duration::from_millis(10));
        assert_eq!(config.min_request_interval, Duration::ZERO);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.user_agent, "test-agent");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_relative_base_url() {
        let config = ClientConfig::default().with_base_url("/v1");
        assert!(matches!(
            config.validate(),
            Err(TripItError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let config = ClientConfig::default().with_base_url("ftp://api.tripit.com/v1");
        assert!(matches!(
            config.validate(),
            Err(TripItError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_retries_and_timeout() {
        let config = ClientConfig::default().with_max_retries(0);
        assert!(config.validate().is_err());

        let config = ClientConfig::default().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_url() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoint_url("/list/trip"),
            "https://api.tripit.com/v1/list/trip"
        );

        let config = ClientConfig::default().with_base_url("http://localhost:1234/");
        assert_eq!(
            config.endpoint_url("/get/profile"),
            "http://localhost:1234/get/profile"
        );
    }
}
