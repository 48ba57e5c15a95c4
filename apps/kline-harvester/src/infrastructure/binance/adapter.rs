//! Binance adapter implementing MarketDataPort.

use async_trait::async_trait;

use crate::application::ports::{Instrument, MarketDataError, MarketDataPort};
use crate::models::Kline;

use super::api_types::{ExchangeInfoResponse, RawKline};
use super::config::BinanceConfig;
use super::error::BinanceError;
use super::http_client::BinanceHttpClient;

/// Maximum rows the klines endpoint returns per request.
const KLINES_PAGE_LIMIT: usize = 1000;

/// Binance Spot market data adapter.
///
/// Implements `MarketDataPort` for the Binance REST API. The underlying
/// connection pool is released when the adapter is dropped, on every exit
/// path.
#[derive(Debug, Clone)]
pub struct BinanceMarketDataAdapter {
    client: BinanceHttpClient,
}

impl BinanceMarketDataAdapter {
    /// Create a new Binance adapter.
    pub fn new(config: &BinanceConfig) -> Result<Self, BinanceError> {
        let client = BinanceHttpClient::new(config)?;
        Ok(Self { client })
    }

    /// Connectivity check. Failure here means no session can be established
    /// and the run must abort before any batch work starts.
    pub async fn ping(&self) -> Result<(), MarketDataError> {
        let _: serde_json::Value = self
            .client
            .get("/api/v3/ping", &[])
            .await
            .map_err(MarketDataError::from)?;
        Ok(())
    }

    /// Fetch one page of klines starting at `cursor`.
    async fn klines_page(
        &self,
        symbol: &str,
        interval: &str,
        cursor: i64,
        end_ms: i64,
    ) -> Result<Vec<RawKline>, BinanceError> {
        self.client
            .get(
                "/api/v3/klines",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.to_string()),
                    ("startTime", cursor.to_string()),
                    // The API treats endTime as inclusive; the port contract
                    // is a half-open window.
                    ("endTime", (end_ms - 1).to_string()),
                    ("limit", KLINES_PAGE_LIMIT.to_string()),
                ],
            )
            .await
    }
}

#[async_trait]
impl MarketDataPort for BinanceMarketDataAdapter {
    async fn list_instruments(&self) -> Result<Vec<Instrument>, MarketDataError> {
        let info: ExchangeInfoResponse = self
            .client
            .get("/api/v3/exchangeInfo", &[])
            .await
            .map_err(MarketDataError::from)?;

        Ok(info.symbols.into_iter().map(Instrument::from).collect())
    }

    async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Kline>, MarketDataError> {
        let mut klines = Vec::new();
        let mut cursor = start_ms;

        while cursor < end_ms {
            let raw = self
                .klines_page(symbol, interval, cursor, end_ms)
                .await
                .map_err(MarketDataError::from)?;
            if raw.is_empty() {
                break;
            }

            let page_len = raw.len();
            for row in &raw {
                klines.push(row.to_kline().map_err(MarketDataError::from)?);
            }

            if page_len < KLINES_PAGE_LIMIT {
                break;
            }
            // Resume past the last bucket we received.
            match klines.last() {
                Some(last) if last.open_time >= cursor => cursor = last.open_time + 1,
                _ => break,
            }
        }

        tracing::debug!(
            symbol = %symbol,
            interval = %interval,
            rows = klines.len(),
            "Kline window assembled"
        );
        Ok(klines)
    }
}
