//! Binance API response types.
//!
//! Kline rows arrive as twelve-element JSON arrays mixing numbers and
//! decimal strings. They are deserialized into a typed tuple struct here and
//! converted to the named `Kline` record immediately; no positional access
//! leaks past this module.

use serde::Deserialize;

use super::error::BinanceError;
use crate::application::ports::Instrument;
use crate::models::Kline;

/// Largest float magnitude that still represents every integer exactly.
const MAX_EXACT_INT_IN_F64: f64 = 9_007_199_254_740_992.0;

/// Exchange info response.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfoResponse {
    /// All listed symbols.
    pub symbols: Vec<SymbolInfo>,
}

/// One symbol entry from exchange info.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolInfo {
    /// Instrument symbol.
    pub symbol: String,
    /// Quote asset of the pair.
    #[serde(rename = "quoteAsset")]
    pub quote_asset: String,
}

impl From<SymbolInfo> for Instrument {
    fn from(info: SymbolInfo) -> Self {
        Self {
            symbol: info.symbol,
            quote_asset: info.quote_asset,
        }
    }
}

/// Error body returned by the API on non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceErrorResponse {
    /// Numeric error code.
    pub code: Option<i64>,
    /// Human-readable message.
    pub msg: Option<String>,
}

/// One raw wire value: the API mixes JSON numbers and decimal strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    /// Integral JSON number.
    Int(i64),
    /// Fractional JSON number.
    Float(f64),
    /// Decimal string.
    Text(String),
}

impl RawField {
    fn render(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Coerce to `i64`, rejecting anything that would lose precision.
    fn as_i64(&self, field: &'static str) -> Result<i64, BinanceError> {
        match self {
            Self::Int(v) => Ok(*v),
            Self::Float(v) if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT_IN_F64 => Ok(*v as i64),
            Self::Text(s) => s.parse().map_err(|_| BinanceError::FieldCoercion {
                field,
                value: s.clone(),
            }),
            other => Err(BinanceError::FieldCoercion {
                field,
                value: other.render(),
            }),
        }
    }

    /// Coerce to `u64`, rejecting negatives and precision loss.
    fn as_u64(&self, field: &'static str) -> Result<u64, BinanceError> {
        match self {
            Self::Int(v) if *v >= 0 => Ok(*v as u64),
            Self::Float(v) if v.fract() == 0.0 && *v >= 0.0 && *v < MAX_EXACT_INT_IN_F64 => {
                Ok(*v as u64)
            }
            Self::Text(s) => s.parse().map_err(|_| BinanceError::FieldCoercion {
                field,
                value: s.clone(),
            }),
            other => Err(BinanceError::FieldCoercion {
                field,
                value: other.render(),
            }),
        }
    }

    /// Coerce to `f64`.
    fn as_f64(&self, field: &'static str) -> Result<f64, BinanceError> {
        match self {
            Self::Int(v) => Ok(*v as f64),
            Self::Float(v) => Ok(*v),
            Self::Text(s) => s.parse().map_err(|_| BinanceError::FieldCoercion {
                field,
                value: s.clone(),
            }),
        }
    }
}

/// One kline row exactly as the wire carries it: open time, OHLC, volume,
/// close time, quote volume, trade count, taker buy volumes, and a final
/// field the API documents as ignorable.
#[derive(Debug, Clone, Deserialize)]
pub struct RawKline(
    pub RawField,
    pub RawField,
    pub RawField,
    pub RawField,
    pub RawField,
    pub RawField,
    pub RawField,
    pub RawField,
    pub RawField,
    pub RawField,
    pub RawField,
    pub RawField,
);

impl RawKline {
    /// Coerce into the typed record. Positions map to names exactly once,
    /// here; any unparseable field is a typed error.
    pub fn to_kline(&self) -> Result<Kline, BinanceError> {
        Ok(Kline {
            open_time: self.0.as_i64("open_time")?,
            open: self.1.as_f64("open")?,
            high: self.2.as_f64("high")?,
            low: self.3.as_f64("low")?,
            close: self.4.as_f64("close")?,
            volume: self.5.as_f64("volume")?,
            close_time: self.6.as_i64("close_time")?,
            quote_asset_volume: self.7.as_f64("quote_asset_volume")?,
            trade_count: self.8.as_u64("number_of_trades")?,
            taker_buy_base_volume: self.9.as_f64("taker_buy_base_asset_volume")?,
            taker_buy_quote_volume: self.10.as_f64("taker_buy_quote_asset_volume")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE_ROW: &str = r#"[
        1700000000000,
        "0.00012345",
        "0.00012400",
        "0.00012300",
        "0.00012350",
        "123.45",
        1700000059999,
        "0.01523",
        42,
        "60.5",
        "0.00747",
        "0"
    ]"#;

    #[test]
    fn wire_row_coerces_to_typed_kline() {
        let raw: RawKline = serde_json::from_str(WIRE_ROW).unwrap();
        let kline = raw.to_kline().unwrap();

        assert_eq!(kline.open_time, 1_700_000_000_000);
        assert_eq!(kline.open, 0.000_123_45);
        assert_eq!(kline.volume, 123.45);
        assert_eq!(kline.close_time, 1_700_000_059_999);
        assert_eq!(kline.trade_count, 42);
        assert_eq!(kline.taker_buy_base_volume, 60.5);
    }

    #[test]
    fn string_numerals_coerce_to_integers() {
        let field = RawField::Text("1700000000000".to_string());
        assert_eq!(field.as_i64("open_time").unwrap(), 1_700_000_000_000);
    }

    #[test]
    fn string_numerals_coerce_to_floats() {
        let field = RawField::Text("123.45".to_string());
        assert_eq!(field.as_f64("volume").unwrap(), 123.45);
    }

    #[test]
    fn garbage_text_is_a_typed_coercion_error() {
        let field = RawField::Text("not-a-number".to_string());
        let err = field.as_f64("volume").unwrap_err();
        assert!(matches!(
            err,
            BinanceError::FieldCoercion { field: "volume", .. }
        ));
    }

    #[test]
    fn fractional_float_does_not_coerce_to_integer() {
        let field = RawField::Float(1.5);
        assert!(field.as_i64("open_time").is_err());
    }

    #[test]
    fn negative_count_is_rejected() {
        let field = RawField::Int(-1);
        assert!(field.as_u64("number_of_trades").is_err());
    }

    #[test]
    fn short_row_fails_to_deserialize() {
        let row = r#"[1700000000000, "0.1", "0.2"]"#;
        assert!(serde_json::from_str::<RawKline>(row).is_err());
    }

    #[test]
    fn symbol_info_converts_to_instrument() {
        let json = r#"{"symbol": "ETHBTC", "quoteAsset": "BTC", "status": "TRADING"}"#;
        let info: SymbolInfo = serde_json::from_str(json).unwrap();
        let instrument: Instrument = info.into();
        assert_eq!(instrument.symbol, "ETHBTC");
        assert_eq!(instrument.quote_asset, "BTC");
    }
}
