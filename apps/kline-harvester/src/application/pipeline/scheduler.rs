//! Batched, rate-limited concurrent fetch controller.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::application::pipeline::fetcher::{self, FetchRequest, FetchWindow, RetryPolicy};
use crate::application::ports::MarketDataPort;
use crate::models::HistoricalDataset;

/// Scheduling parameters for the fetch phase.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Maximum symbols fetched concurrently in one batch.
    pub batch_size: usize,
    /// Pause between batches (not applied after the last one).
    pub inter_batch_delay: Duration,
    /// Per-symbol retry policy.
    pub retry: RetryPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            inter_batch_delay: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }
}

/// Split the universe into contiguous batches of at most `batch_size`,
/// preserving discovery order. Only the last batch may be smaller.
#[must_use]
pub fn partition(universe: &[String], batch_size: usize) -> Vec<Vec<String>> {
    universe
        .chunks(batch_size.max(1))
        .map(<[String]>::to_vec)
        .collect()
}

/// Run the fetch phase over the whole universe.
///
/// Each batch fans out one task per symbol, bounding peak in-flight remote
/// calls to `batch_size`. A panicked task is logged and treated as no data
/// for its symbol; nothing below the batch boundary can abort the run.
pub async fn run(
    source: Arc<dyn MarketDataPort>,
    universe: &[String],
    window: &FetchWindow,
    config: &SchedulerConfig,
) -> HistoricalDataset {
    let mut dataset = HistoricalDataset::new();
    let batches = partition(universe, config.batch_size);
    let total = batches.len();

    for (index, batch) in batches.iter().enumerate() {
        tracing::info!(
            batch = index + 1,
            total,
            symbols = ?batch,
            "Processing batch"
        );

        let handles: Vec<_> = batch
            .iter()
            .map(|symbol| {
                let source = Arc::clone(&source);
                let request = FetchRequest::new(symbol.clone(), window);
                let policy = config.retry.clone();
                tokio::spawn(async move {
                    fetcher::fetch_symbol(source.as_ref(), &request, &policy).await
                })
            })
            .collect();

        for (result, symbol) in join_all(handles).await.into_iter().zip(batch.iter()) {
            match result {
                Ok(outcome) => {
                    if outcome.klines.is_empty() {
                        tracing::warn!(symbol = %outcome.symbol, "No usable data, symbol omitted");
                    } else {
                        dataset.insert(outcome.symbol, outcome.klines);
                    }
                }
                Err(e) => {
                    tracing::error!(
                        symbol = %symbol,
                        error = %e,
                        "Fetch task failed unexpectedly, symbol omitted"
                    );
                }
            }
        }

        if index + 1 < total {
            tracing::info!(
                delay_secs = config.inter_batch_delay.as_secs(),
                "Pausing before next batch"
            );
            tokio::time::sleep(config.inter_batch_delay).await;
        }
    }

    dataset
}
