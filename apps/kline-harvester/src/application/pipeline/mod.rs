//! The harvest pipeline: discover, fetch in batches, rank, project, persist.

pub mod fetcher;
pub mod projector;
pub mod ranker;
pub mod scheduler;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::application::ports::{MarketDataError, MarketDataPort};
use crate::infrastructure::sink::{self, SinkError};
use crate::models::SymbolVolume;

pub use fetcher::{FetchOutcome, FetchRequest, FetchWindow, RetryPolicy};
pub use scheduler::SchedulerConfig;

/// Full configuration surface of one harvest run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Quote asset that selects the instrument universe (e.g., "BTC").
    pub quote_asset: String,
    /// Kline interval granularity (e.g., "1m").
    pub interval: String,
    /// First calendar day of the window (inclusive, UTC).
    pub start: NaiveDate,
    /// First calendar day past the window (exclusive, UTC).
    pub end: NaiveDate,
    /// Maximum symbols fetched concurrently per batch.
    pub batch_size: usize,
    /// Pause between batches.
    pub inter_batch_delay: Duration,
    /// Per-symbol retry policy.
    pub retry: RetryPolicy,
    /// Number of top-ranked symbols kept in the output.
    pub top_k: usize,
    /// Destination of the Parquet artifact.
    pub output_path: PathBuf,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    /// Instruments discovered for the quote asset.
    pub universe_size: usize,
    /// Symbols that yielded usable data.
    pub symbols_with_data: usize,
    /// Ranked volumes for every symbol with data, descending.
    pub ranking: Vec<SymbolVolume>,
    /// Output rows written.
    pub records_written: usize,
}

/// Fatal pipeline errors. Everything below the batch boundary is contained
/// by the scheduler and never surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Universe discovery failed; no meaningful work can proceed.
    #[error("Universe discovery failed: {0}")]
    Discovery(#[source] MarketDataError),

    /// The configured date window is empty or inverted.
    #[error("Invalid date window: start {start} is not before end {end}")]
    InvalidWindow {
        /// Window start date.
        start: NaiveDate,
        /// Window end date.
        end: NaiveDate,
    },

    /// Writing the output artifact failed.
    #[error(transparent)]
    Persistence(#[from] SinkError),
}

/// Convert the `[start, end)` calendar window into epoch-millisecond bounds.
fn window_bounds(config: &HarvestConfig) -> Result<(i64, i64), PipelineError> {
    if config.start >= config.end {
        return Err(PipelineError::InvalidWindow {
            start: config.start,
            end: config.end,
        });
    }
    let start_ms = config
        .start
        .and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .timestamp_millis();
    let end_ms = config
        .end
        .and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .timestamp_millis();
    Ok((start_ms, end_ms))
}

/// Run the whole pipeline against `source` and persist the artifact.
///
/// Discovery and persistence failures are fatal; per-symbol fetch failures
/// degrade to absence from the dataset.
pub async fn run(
    source: Arc<dyn MarketDataPort>,
    config: &HarvestConfig,
) -> Result<HarvestSummary, PipelineError> {
    let (start_ms, end_ms) = window_bounds(config)?;

    let instruments = source
        .list_instruments()
        .await
        .map_err(PipelineError::Discovery)?;
    let universe: Vec<String> = instruments
        .into_iter()
        .filter(|i| i.quote_asset == config.quote_asset)
        .map(|i| i.symbol)
        .collect();
    tracing::info!(
        count = universe.len(),
        quote_asset = %config.quote_asset,
        "Discovered instrument universe"
    );

    let window = FetchWindow {
        interval: config.interval.clone(),
        start_ms,
        end_ms,
    };
    let scheduler_config = SchedulerConfig {
        batch_size: config.batch_size,
        inter_batch_delay: config.inter_batch_delay,
        retry: config.retry.clone(),
    };
    let dataset = scheduler::run(source, &universe, &window, &scheduler_config).await;
    tracing::info!(
        symbols_with_data = dataset.len(),
        universe = universe.len(),
        "Fetch phase complete"
    );

    let ranking = ranker::rank(&dataset);
    let records = projector::project(&dataset, &ranking, config.top_k);
    tracing::info!(
        top_k = config.top_k,
        records = records.len(),
        "Projected top-ranked symbols"
    );

    sink::parquet::persist(&records, &config.output_path)?;
    tracing::info!(path = %config.output_path.display(), "Artifact written");

    Ok(HarvestSummary {
        universe_size: universe.len(),
        symbols_with_data: dataset.len(),
        ranking,
        records_written: records.len(),
    })
}
