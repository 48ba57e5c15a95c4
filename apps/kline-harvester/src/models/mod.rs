//! Core data model shared across pipeline stages.

mod dataset;
mod kline;
mod ranking;

pub use dataset::HistoricalDataset;
pub use kline::{Kline, KlineRecord};
pub use ranking::SymbolVolume;
