//! Market Data Port (Driven Port)
//!
//! Interface for the remote exchange collaborator. The pipeline only sees
//! this trait; the infrastructure layer provides the concrete adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::Kline;

/// One tradable instrument as reported by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Instrument symbol (e.g., "ETHBTC").
    pub symbol: String,
    /// Quote asset of the pair (e.g., "BTC").
    pub quote_asset: String,
}

/// Market data error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarketDataError {
    /// Connection error.
    #[error("Market data connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Response could not be decoded into the expected shape.
    #[error("Malformed market data response: {message}")]
    MalformedResponse {
        /// Error details.
        message: String,
    },

    /// API error.
    #[error("Market data API error: {message}")]
    ApiError {
        /// Error details.
        message: String,
    },
}

/// Port for the remote exchange data source.
///
/// This is a driven (secondary/outbound) port. Implementations must be safe
/// to share across concurrent fetch tasks; all methods take `&self`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Enumerate tradable instruments with their quote-asset metadata.
    async fn list_instruments(&self) -> Result<Vec<Instrument>, MarketDataError>;

    /// Fetch the full ordered kline sequence for a symbol over
    /// `[start_ms, end_ms)` at the given interval granularity.
    async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Kline>, MarketDataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instrument_equality() {
        let a = Instrument {
            symbol: "ETHBTC".to_string(),
            quote_asset: "BTC".to_string(),
        };
        assert_eq!(a, a.clone());
    }

    #[test]
    fn errors_render_their_detail() {
        let err = MarketDataError::ConnectionError {
            message: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("connection refused"));

        let err = MarketDataError::RateLimited {
            retry_after_secs: 60,
        };
        assert!(err.to_string().contains("60"));
    }
}
