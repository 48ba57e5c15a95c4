//! End-to-end pipeline tests over a scripted market data source.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use kline_harvester::application::pipeline::{self, HarvestConfig, RetryPolicy};
use kline_harvester::application::ports::{Instrument, MarketDataError, MarketDataPort};
use kline_harvester::models::Kline;

/// Scripted data source: fixed instruments, fixed klines per symbol, a set
/// of symbols that always fail, and per-symbol attempt accounting.
struct ScriptedSource {
    instruments: Vec<Instrument>,
    klines: HashMap<String, Vec<Kline>>,
    failing: Vec<String>,
    attempts: Mutex<HashMap<String, u32>>,
}

impl ScriptedSource {
    fn new(instruments: Vec<Instrument>, klines: HashMap<String, Vec<Kline>>) -> Self {
        Self {
            instruments,
            klines,
            failing: Vec::new(),
            attempts: Mutex::new(HashMap::new()),
        }
    }

    fn with_failing(mut self, symbols: &[&str]) -> Self {
        self.failing = symbols.iter().map(|s| (*s).to_string()).collect();
        self
    }

    fn attempts_for(&self, symbol: &str) -> u32 {
        self.attempts
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl MarketDataPort for ScriptedSource {
    async fn list_instruments(&self) -> Result<Vec<Instrument>, MarketDataError> {
        Ok(self.instruments.clone())
    }

    async fn get_klines(
        &self,
        symbol: &str,
        _interval: &str,
        _start_ms: i64,
        _end_ms: i64,
    ) -> Result<Vec<Kline>, MarketDataError> {
        *self
            .attempts
            .lock()
            .unwrap()
            .entry(symbol.to_string())
            .or_insert(0) += 1;

        if self.failing.iter().any(|s| s == symbol) {
            return Err(MarketDataError::ConnectionError {
                message: "synthetic outage".to_string(),
            });
        }
        Ok(self.klines.get(symbol).cloned().unwrap_or_default())
    }
}

fn btc_instrument(symbol: &str) -> Instrument {
    Instrument {
        symbol: symbol.to_string(),
        quote_asset: "BTC".to_string(),
    }
}

fn kline(open_time: i64, volume: f64) -> Kline {
    Kline {
        open_time,
        open: 0.001,
        high: 0.002,
        low: 0.0005,
        close: 0.0015,
        volume,
        close_time: open_time + 59_999,
        quote_asset_volume: volume * 0.001,
        trade_count: 10,
        taker_buy_base_volume: volume / 2.0,
        taker_buy_quote_volume: volume * 0.0005,
    }
}

fn config(top_k: usize, output_path: PathBuf) -> HarvestConfig {
    HarvestConfig {
        quote_asset: "BTC".to_string(),
        interval: "1m".to_string(),
        start: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        batch_size: 5,
        inter_batch_delay: Duration::ZERO,
        retry: RetryPolicy {
            max_retries: 3,
            backoff_base: Duration::ZERO,
        },
        top_k,
        output_path,
    }
}

/// The seven-symbol scenario: universe [A..G] with batch_size 5, C fails
/// permanently, F and G tie on volume.
fn seven_symbol_source() -> ScriptedSource {
    let universe = ["AAABTC", "BBBBTC", "CCCBTC", "DDDBTC", "EEEBTC", "FFFBTC", "GGGBTC"];
    let volumes: &[(&str, &[f64])] = &[
        ("AAABTC", &[4.0, 6.0]),
        ("BBBBTC", &[20.0, 30.0]),
        ("DDDBTC", &[5.0]),
        ("EEEBTC", &[70.0]),
        ("FFFBTC", &[10.0, 20.0]),
        ("GGGBTC", &[30.0]),
    ];

    let mut klines = HashMap::new();
    for (symbol, per_bucket) in volumes {
        let series: Vec<Kline> = per_bucket
            .iter()
            .enumerate()
            .map(|(i, v)| kline(i as i64 * 60_000, *v))
            .collect();
        klines.insert((*symbol).to_string(), series);
    }

    ScriptedSource::new(universe.iter().map(|s| btc_instrument(s)).collect(), klines)
        .with_failing(&["CCCBTC"])
}

#[tokio::test]
async fn seven_symbol_run_ranks_and_projects_top_three() {
    let tmp = tempfile::tempdir().unwrap();
    let output_path = tmp.path().join("top3.parquet");
    let source = Arc::new(seven_symbol_source());

    let summary = pipeline::run(Arc::clone(&source) as Arc<dyn MarketDataPort>, &config(3, output_path.clone()))
        .await
        .unwrap();

    assert_eq!(summary.universe_size, 7);
    // C exhausted its retries and is absent entirely.
    assert_eq!(summary.symbols_with_data, 6);
    assert_eq!(source.attempts_for("CCCBTC"), 3);

    // Descending by summed volume; F and G tie at 30 and keep universe order.
    let ranked: Vec<&str> = summary.ranking.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(
        ranked,
        vec!["EEEBTC", "BBBBTC", "FFFBTC", "GGGBTC", "AAABTC", "DDDBTC"]
    );
    assert!(summary.ranking.iter().all(|r| r.symbol != "CCCBTC"));

    // Top-3 projection: E (1 kline) + B (2 klines) + F (2 klines).
    assert_eq!(summary.records_written, 5);
    assert!(output_path.exists());
}

#[tokio::test]
async fn failed_symbol_leaves_batch_mates_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let source = Arc::new(seven_symbol_source());

    let summary = pipeline::run(
        Arc::clone(&source) as Arc<dyn MarketDataPort>,
        &config(100, tmp.path().join("all.parquet")),
    )
    .await
    .unwrap();

    // C shares its batch with A, B, D, E; all four fetched exactly once.
    for symbol in ["AAABTC", "BBBBTC", "DDDBTC", "EEEBTC"] {
        assert_eq!(source.attempts_for(symbol), 1, "{symbol}");
    }
    assert_eq!(summary.symbols_with_data, 6);
    // All six survivors' klines are written when k exceeds the universe.
    assert_eq!(summary.records_written, 9);
}

#[tokio::test]
async fn non_quote_instruments_are_excluded_from_the_universe() {
    let tmp = tempfile::tempdir().unwrap();
    let mut klines = HashMap::new();
    klines.insert("AAABTC".to_string(), vec![kline(0, 1.0)]);
    klines.insert("AAAUSDT".to_string(), vec![kline(0, 99.0)]);

    let instruments = vec![
        btc_instrument("AAABTC"),
        Instrument {
            symbol: "AAAUSDT".to_string(),
            quote_asset: "USDT".to_string(),
        },
    ];
    let source = Arc::new(ScriptedSource::new(instruments, klines));

    let summary = pipeline::run(
        Arc::clone(&source) as Arc<dyn MarketDataPort>,
        &config(100, tmp.path().join("btc_only.parquet")),
    )
    .await
    .unwrap();

    assert_eq!(summary.universe_size, 1);
    assert_eq!(source.attempts_for("AAAUSDT"), 0);
    assert_eq!(summary.ranking[0].symbol, "AAABTC");
}

#[tokio::test]
async fn empty_universe_produces_empty_well_formed_artifact() {
    let tmp = tempfile::tempdir().unwrap();
    let output_path = tmp.path().join("empty.parquet");
    let source = Arc::new(ScriptedSource::new(Vec::new(), HashMap::new()));

    let summary = pipeline::run(source as Arc<dyn MarketDataPort>, &config(100, output_path.clone()))
        .await
        .unwrap();

    assert_eq!(summary.universe_size, 0);
    assert_eq!(summary.symbols_with_data, 0);
    assert_eq!(summary.records_written, 0);
    assert!(output_path.exists());
}

#[tokio::test]
async fn discovery_failure_is_fatal() {
    struct BrokenDiscovery;

    #[async_trait]
    impl MarketDataPort for BrokenDiscovery {
        async fn list_instruments(&self) -> Result<Vec<Instrument>, MarketDataError> {
            Err(MarketDataError::ConnectionError {
                message: "exchange down".to_string(),
            })
        }

        async fn get_klines(
            &self,
            _symbol: &str,
            _interval: &str,
            _start_ms: i64,
            _end_ms: i64,
        ) -> Result<Vec<Kline>, MarketDataError> {
            unreachable!("discovery failed, no fetch should happen")
        }
    }

    let tmp = tempfile::tempdir().unwrap();
    let result = pipeline::run(
        Arc::new(BrokenDiscovery) as Arc<dyn MarketDataPort>,
        &config(100, tmp.path().join("never.parquet")),
    )
    .await;

    assert!(result.is_err());
}
