//! Management client configuration.

use std::time::Duration;

/// Default address of the projection service.
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:9000";

/// Path of the management resource, relative to the server address.
pub const PROJECTIONS_PATH: &str = "/management/projections";

/// Management client configuration.
#[derive(Debug, Clone)]
pub struct ManagementConfig {
    /// Server address, with or without scheme.
    pub server_address: String,
    /// Bearer token sent with every request.
    pub api_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for read requests.
    pub max_retries: u32,
    /// Retry delay base (in milliseconds), doubled on every attempt.
    pub retry_delay_ms: u64,
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            api_token: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl ManagementConfig {
    /// Creates a new config for a server address.
    pub fn new(server_address: impl Into<String>) -> Self {
        Self {
            server_address: server_address.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn retry_delay_ms(mut self, delay: u64) -> Self {
        self.retry_delay_ms = delay;
        self
    }

    /// URL of the management resource. Addresses without a scheme use `http`.
    #[must_use]
    pub fn projections_url(&self) -> String {
        let address = self.server_address.trim().trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            format!("{address}{PROJECTIONS_PATH}")
        } else {
            format!("http://{address}{PROJECTIONS_PATH}")
        }
    }

    /// Backoff before the given retry attempt (1-based).
    #[must_use]
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.retry_delay_ms.saturating_mul(factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projections_url() {
        let cases = [
            ("127.0.0.1:9000", "http://127.0.0.1:9000/management/projections"),
            ("http://localhost:9000/", "http://localhost:9000/management/projections"),
            (
                " https://projections.example.com ",
                "https://projections.example.com/management/projections",
            ),
        ];
        for (address, expected) in cases {
            assert_eq!(ManagementConfig::new(address).projections_url(), expected);
        }
    }

    #[test]
    fn test_builder() {
        let config = ManagementConfig::new("localhost:1")
            .api_token("secret")
            .timeout(Duration::from_secs(5))
            .max_retries(1)
            .retry_delay_ms(10);
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry_delay(1), Duration::from_millis(10));
        assert_eq!(config.retry_delay(3), Duration::from_millis(40));
    }

    #[test]
    fn test_defaults() {
        let config = ManagementConfig::default();
        assert_eq!(config.server_address, DEFAULT_SERVER_ADDRESS);
        assert!(config.api_token.is_none());
        assert_eq!(config.max_retries, 3);
    }
}
