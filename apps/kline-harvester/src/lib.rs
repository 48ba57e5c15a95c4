// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Kline Harvester - Library
//!
//! One-shot batch pipeline that discovers every instrument quoted in a
//! configurable asset, fetches its minute klines over a date window with a
//! batched, rate-limited, fault-tolerant concurrent fetch controller, ranks
//! the instruments by summed traded volume, and persists the top-K subset to
//! a Snappy-compressed Parquet file.
//!
//! # Architecture
//!
//! - **Models**: typed klines, output records, the insertion-ordered dataset
//! - **Application**: the port to the remote exchange and the pipeline
//!   stages (fetcher, batch scheduler, ranker, projector)
//! - **Infrastructure**: the Binance REST adapter and the Parquet sink
//!
//! Failure policy: anything below the batch boundary degrades to per-symbol
//! data absence; universe discovery and persistence failures abort the run.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Core data model shared across pipeline stages.
pub mod models;

/// Application layer - pipeline stages and port definitions.
pub mod application;

/// Infrastructure layer - adapters and external integrations.
pub mod infrastructure;

// Model re-exports
pub use models::{HistoricalDataset, Kline, KlineRecord, SymbolVolume};

// Application re-exports
pub use application::pipeline::{
    HarvestConfig, HarvestSummary, PipelineError, RetryPolicy, SchedulerConfig,
};
pub use application::ports::{Instrument, MarketDataError, MarketDataPort};

// Infrastructure re-exports
pub use infrastructure::binance::{BinanceConfig, BinanceError, BinanceMarketDataAdapter};
pub use infrastructure::sink::SinkError;
