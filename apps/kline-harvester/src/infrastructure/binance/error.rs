//! Binance-specific error types.

use thiserror::Error;

use crate::application::ports::MarketDataError;

/// Errors from the Binance adapter.
#[derive(Debug, Error, Clone)]
pub enum BinanceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// API returned an error.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code from the API.
        code: String,
        /// Error message from the API.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Suggested retry delay in seconds.
        retry_after_secs: u64,
    },

    /// Network error (retryable).
    #[error("Network error: {0}")]
    Network(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// A kline field could not be coerced to its declared type.
    #[error("Field '{field}' could not be coerced from {value:?}")]
    FieldCoercion {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value as received.
        value: String,
    },
}

impl From<BinanceError> for MarketDataError {
    fn from(err: BinanceError) -> Self {
        match err {
            BinanceError::Http(msg) | BinanceError::Network(msg) => {
                Self::ConnectionError { message: msg }
            }
            BinanceError::Api { code, message } => Self::ApiError {
                message: format!("{code}: {message}"),
            },
            BinanceError::RateLimited { retry_after_secs } => {
                Self::RateLimited { retry_after_secs }
            }
            BinanceError::JsonParse(msg) => Self::MalformedResponse { message: msg },
            BinanceError::FieldCoercion { field, value } => Self::MalformedResponse {
                message: format!("field '{field}' could not be coerced from {value:?}"),
            },
        }
    }
}
