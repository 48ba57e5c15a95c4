//! Binance adapter configuration.

use std::time::Duration;

/// Production REST endpoint.
const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Configuration for the Binance market data adapter.
///
/// Credentials are optional: the endpoints this system uses are public, but
/// authenticated requests get higher rate-limit weight allowances, so the
/// API key header is attached when present.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// API key, attached as the `X-MBX-APIKEY` header when present.
    pub api_key: Option<String>,
    /// API secret. Unused by the public endpoints; kept with the key so the
    /// whole credential pair lives in one scoped place.
    pub api_secret: Option<String>,
    /// REST base URL.
    pub base_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl BinanceConfig {
    /// Create a configuration with default endpoint and timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the credential pair.
    #[must_use]
    pub fn with_credentials(mut self, api_key: String, api_secret: String) -> Self {
        self.api_key = Some(api_key);
        self.api_secret = Some(api_secret);
        self
    }

    /// Override the REST base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_production() {
        let config = BinanceConfig::new();
        assert_eq!(config.base_url, "https://api.binance.com");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides_apply() {
        let config = BinanceConfig::new()
            .with_credentials("key".to_string(), "secret".to_string())
            .with_base_url("http://localhost:9000")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
