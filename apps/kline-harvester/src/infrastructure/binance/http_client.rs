//! HTTP client wrapper for the Binance REST API.
//!
//! Issues single attempts only; the fetch retry policy lives in the
//! pipeline's fetcher, where the pacing contract is defined.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::api_types::BinanceErrorResponse;
use super::config::BinanceConfig;
use super::error::BinanceError;

/// Fallback retry hint when a 429 arrives without a Retry-After header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// HTTP client for the Binance API.
#[derive(Debug, Clone)]
pub struct BinanceHttpClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BinanceHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &BinanceConfig) -> Result<Self, BinanceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BinanceError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Make a GET request and decode the JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BinanceError> {
        let url = format!("{}{path}", self.base_url);

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header("X-MBX-APIKEY", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BinanceError::Network(e.to_string()))?;

        let status = response.status();

        if status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| BinanceError::Network(e.to_string()))?;
            return serde_json::from_str(&text).map_err(|e| BinanceError::JsonParse(e.to_string()));
        }

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let error_body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<BinanceErrorResponse>(&error_body) {
            Ok(err) => (
                err.code
                    .map_or_else(|| status.as_u16().to_string(), |c| c.to_string()),
                err.msg.unwrap_or(error_body),
            ),
            Err(_) => (status.as_u16().to_string(), error_body),
        };

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(BinanceError::RateLimited {
                retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            });
        }

        Err(BinanceError::Api { code, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn trailing_slash_in_base_url_is_trimmed() {
        let config = BinanceConfig::new().with_base_url("http://localhost:9000/");
        let client = BinanceHttpClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");
    }

    #[test]
    fn client_builds_with_custom_timeout() {
        let config = BinanceConfig::new().with_timeout(Duration::from_secs(3));
        assert!(BinanceHttpClient::new(&config).is_ok());
    }
}
