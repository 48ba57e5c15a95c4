//! Per-symbol fetch with bounded retries.

use std::time::Duration;

use crate::application::ports::MarketDataPort;
use crate::models::Kline;

/// Retry policy for a single symbol's fetch.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, counting the first.
    pub max_retries: u32,
    /// Base delay; attempt `n` waits `backoff_base * n` before retrying.
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_secs(10),
        }
    }
}

/// The shared window parameters of a harvest run.
#[derive(Debug, Clone)]
pub struct FetchWindow {
    /// Interval granularity (e.g., "1m").
    pub interval: String,
    /// Window start (epoch milliseconds, inclusive).
    pub start_ms: i64,
    /// Window end (epoch milliseconds, exclusive).
    pub end_ms: i64,
}

/// One symbol's fetch parameters.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Instrument symbol.
    pub symbol: String,
    /// Interval granularity.
    pub interval: String,
    /// Window start (epoch milliseconds, inclusive).
    pub start_ms: i64,
    /// Window end (epoch milliseconds, exclusive).
    pub end_ms: i64,
}

impl FetchRequest {
    /// Build a request for `symbol` over the shared window.
    #[must_use]
    pub fn new(symbol: String, window: &FetchWindow) -> Self {
        Self {
            symbol,
            interval: window.interval.clone(),
            start_ms: window.start_ms,
            end_ms: window.end_ms,
        }
    }
}

/// Result of one symbol's fetch. Empty klines mean the symbol produced no
/// usable data (exhausted retries or a genuinely empty window).
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Instrument symbol.
    pub symbol: String,
    /// Ordered kline sequence, exactly as received.
    pub klines: Vec<Kline>,
}

/// Linear backoff calculator.
struct LinearBackoff {
    attempt: u32,
    max_attempts: u32,
    base: Duration,
}

impl LinearBackoff {
    const fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempt: 0,
            max_attempts: policy.max_retries,
            base: policy.backoff_base,
        }
    }

    fn next_delay(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }
        Some(self.base * self.attempt)
    }
}

/// Fetch one symbol's klines, retrying failures with linear backoff.
///
/// Exhausting all attempts degrades to an empty outcome; the caller decides
/// what absence means. This function never returns an error.
pub async fn fetch_symbol(
    source: &dyn MarketDataPort,
    request: &FetchRequest,
    policy: &RetryPolicy,
) -> FetchOutcome {
    let mut backoff = LinearBackoff::new(policy);

    loop {
        match source
            .get_klines(
                &request.symbol,
                &request.interval,
                request.start_ms,
                request.end_ms,
            )
            .await
        {
            Ok(klines) => {
                tracing::info!(
                    symbol = %request.symbol,
                    rows = klines.len(),
                    "Fetched klines"
                );
                return FetchOutcome {
                    symbol: request.symbol.clone(),
                    klines,
                };
            }
            Err(e) => {
                if let Some(delay) = backoff.next_delay() {
                    tracing::warn!(
                        symbol = %request.symbol,
                        error = %e,
                        attempt = backoff.attempt,
                        max_attempts = backoff.max_attempts,
                        delay_ms = delay.as_millis(),
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                } else {
                    tracing::warn!(
                        symbol = %request.symbol,
                        error = %e,
                        attempts = backoff.attempt,
                        "Retries exhausted, skipping symbol"
                    );
                    return FetchOutcome {
                        symbol: request.symbol.clone(),
                        klines: Vec::new(),
                    };
                }
            }
        }
    }
}
