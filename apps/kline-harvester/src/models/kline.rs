//! Typed interval records.

use serde::{Deserialize, Serialize};

/// One time-bucketed OHLCV observation for a symbol.
///
/// Field types are part of the output contract: timestamps and counts are
/// integers, prices and volumes are floats. Raw wire values are coerced into
/// these types once, at the exchange boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// Bucket open time (epoch milliseconds).
    pub open_time: i64,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Base asset volume traded in the bucket.
    pub volume: f64,
    /// Bucket close time (epoch milliseconds).
    pub close_time: i64,
    /// Quote asset volume traded in the bucket.
    pub quote_asset_volume: f64,
    /// Number of trades in the bucket.
    pub trade_count: u64,
    /// Taker buy base asset volume.
    pub taker_buy_base_volume: f64,
    /// Taker buy quote asset volume.
    pub taker_buy_quote_volume: f64,
}

/// One denormalized output row: a symbol paired with one of its klines.
///
/// This is the exact shape persisted to the columnar artifact, one row per
/// (symbol, interval).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlineRecord {
    /// Instrument symbol.
    pub symbol: String,
    /// Bucket open time (epoch milliseconds).
    pub open_time: i64,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Base asset volume.
    pub volume: f64,
    /// Bucket close time (epoch milliseconds).
    pub close_time: i64,
    /// Quote asset volume.
    pub quote_asset_volume: f64,
    /// Number of trades.
    pub number_of_trades: u64,
    /// Taker buy base asset volume.
    pub taker_buy_base_asset_volume: f64,
    /// Taker buy quote asset volume.
    pub taker_buy_quote_asset_volume: f64,
}

impl KlineRecord {
    /// Flatten one kline of `symbol` into an output row.
    #[must_use]
    pub fn new(symbol: &str, kline: &Kline) -> Self {
        Self {
            symbol: symbol.to_string(),
            open_time: kline.open_time,
            open: kline.open,
            high: kline.high,
            low: kline.low,
            close: kline.close,
            volume: kline.volume,
            close_time: kline.close_time,
            quote_asset_volume: kline.quote_asset_volume,
            number_of_trades: kline.trade_count,
            taker_buy_base_asset_volume: kline.taker_buy_base_volume,
            taker_buy_quote_asset_volume: kline.taker_buy_quote_volume,
        }
    }
}
