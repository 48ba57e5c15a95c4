//! Binance Spot Market Data Adapter
//!
//! Implementation of `MarketDataPort` for the Binance REST API with:
//! - Instrument discovery via exchange info
//! - Paginated historical kline retrieval
//! - Explicit connectivity check before any batch work
//! - Typed coercion of the wire's array-shaped kline rows

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::BinanceMarketDataAdapter;
pub use config::BinanceConfig;
pub use error::BinanceError;
