//! Kline Harvester Binary
//!
//! Runs one harvest: discover the instrument universe, fetch klines in
//! rate-limited batches, rank by traded volume, write the top-K subset to
//! Parquet, and exit.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin kline-harvester
//! ```
//!
//! # Environment Variables
//!
//! All optional:
//! - `QUOTE_ASSET`: quote asset selecting the universe (default: BTC)
//! - `KLINE_INTERVAL`: interval granularity (default: 1m)
//! - `START_DATE`: window start, YYYY-MM-DD inclusive (default: 2025-02-01)
//! - `END_DATE`: window end, YYYY-MM-DD exclusive (default: 2025-03-01)
//! - `BATCH_SIZE`: symbols fetched concurrently per batch (default: 5)
//! - `INTER_BATCH_DELAY_SECS`: pause between batches (default: 60)
//! - `MAX_RETRIES`: attempts per symbol fetch (default: 3)
//! - `BACKOFF_BASE_SECS`: linear backoff base (default: 10)
//! - `TOP_K`: ranked symbols kept in the output (default: 100)
//! - `OUTPUT_PATH`: Parquet destination (default: historical_data.parquet)
//! - `BINANCE_API_KEY` / `BINANCE_API_SECRET`: credentials (public
//!   endpoints work without them)
//! - `RUST_LOG`: log level (default: info)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use kline_harvester::application::pipeline::{self, HarvestConfig, RetryPolicy};
use kline_harvester::application::ports::MarketDataPort;
use kline_harvester::infrastructure::binance::{BinanceConfig, BinanceMarketDataAdapter};

// All fetch concurrency is cooperative suspension around network I/O; a
// single worker thread serializes every dataset mutation.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing();

    tracing::info!("Starting kline harvester");

    let config = parse_config()?;
    log_config(&config);

    let adapter = create_adapter()?;

    // Session check: a run that cannot reach the exchange must abort before
    // any batch work.
    adapter
        .ping()
        .await
        .context("Exchange is unreachable, aborting run")?;

    let source: Arc<dyn MarketDataPort> = Arc::new(adapter);
    let summary = pipeline::run(source, &config)
        .await
        .context("Harvest failed")?;

    tracing::info!(
        universe = summary.universe_size,
        with_data = summary.symbols_with_data,
        records = summary.records_written,
        "Harvest complete"
    );
    for (position, entry) in summary.ranking.iter().take(config.top_k).enumerate() {
        tracing::info!(
            rank = position + 1,
            symbol = %entry.symbol,
            total_volume = entry.total_volume,
            "Ranked symbol"
        );
    }

    Ok(())
}

/// Load .env file from the current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Initialize the tracing subscriber with environment filter.
///
/// Uses a static directive string that is a compile-time constant guaranteed
/// to parse.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "kline_harvester=info"
                    .parse()
                    .expect("static directive 'kline_harvester=info' is valid"),
            ),
        )
        .init();
}

/// Read an environment variable, falling back to a default.
fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Parse configuration from environment variables.
fn parse_config() -> anyhow::Result<HarvestConfig> {
    let start: NaiveDate = env_or("START_DATE", "2025-02-01")
        .parse()
        .context("START_DATE must be YYYY-MM-DD")?;
    let end: NaiveDate = env_or("END_DATE", "2025-03-01")
        .parse()
        .context("END_DATE must be YYYY-MM-DD")?;

    let batch_size: usize = env_or("BATCH_SIZE", "5")
        .parse()
        .context("BATCH_SIZE must be a positive integer")?;
    let inter_batch_delay_secs: u64 = env_or("INTER_BATCH_DELAY_SECS", "60")
        .parse()
        .context("INTER_BATCH_DELAY_SECS must be an integer")?;
    let max_retries: u32 = env_or("MAX_RETRIES", "3")
        .parse()
        .context("MAX_RETRIES must be an integer")?;
    let backoff_base_secs: u64 = env_or("BACKOFF_BASE_SECS", "10")
        .parse()
        .context("BACKOFF_BASE_SECS must be an integer")?;
    let top_k: usize = env_or("TOP_K", "100")
        .parse()
        .context("TOP_K must be an integer")?;

    Ok(HarvestConfig {
        quote_asset: env_or("QUOTE_ASSET", "BTC"),
        interval: env_or("KLINE_INTERVAL", "1m"),
        start,
        end,
        batch_size,
        inter_batch_delay: Duration::from_secs(inter_batch_delay_secs),
        retry: RetryPolicy {
            max_retries,
            backoff_base: Duration::from_secs(backoff_base_secs),
        },
        top_k,
        output_path: PathBuf::from(env_or("OUTPUT_PATH", "historical_data.parquet")),
    })
}

/// Log the parsed configuration.
fn log_config(config: &HarvestConfig) {
    tracing::info!(
        quote_asset = %config.quote_asset,
        interval = %config.interval,
        start = %config.start,
        end = %config.end,
        batch_size = config.batch_size,
        inter_batch_delay_secs = config.inter_batch_delay.as_secs(),
        max_retries = config.retry.max_retries,
        backoff_base_secs = config.retry.backoff_base.as_secs(),
        top_k = config.top_k,
        output_path = %config.output_path.display(),
        "Configuration loaded"
    );
}

/// Create the Binance adapter from environment credentials.
fn create_adapter() -> anyhow::Result<BinanceMarketDataAdapter> {
    let mut binance_config = BinanceConfig::new();
    if let (Ok(key), Ok(secret)) = (
        std::env::var("BINANCE_API_KEY"),
        std::env::var("BINANCE_API_SECRET"),
    ) {
        binance_config = binance_config.with_credentials(key, secret);
    }

    let adapter =
        BinanceMarketDataAdapter::new(&binance_config).context("Failed to build exchange client")?;
    tracing::info!("Binance adapter initialized");
    Ok(adapter)
}
