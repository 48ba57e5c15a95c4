//! Projection of ranked symbols into flat output rows.

use crate::models::{HistoricalDataset, KlineRecord, SymbolVolume};

/// Flatten the klines of the top `k` ranked symbols into output records.
///
/// Rows are emitted in rank order, then in the chronological order the
/// klines were received; nothing is re-sorted. A ranked symbol missing from
/// the dataset contributes no rows.
#[must_use]
pub fn project(
    dataset: &HistoricalDataset,
    ranked: &[SymbolVolume],
    k: usize,
) -> Vec<KlineRecord> {
    let mut records = Vec::new();
    for entry in ranked.iter().take(k) {
        let klines = dataset.get(&entry.symbol).unwrap_or(&[]);
        records.extend(klines.iter().map(|kline| KlineRecord::new(&entry.symbol, kline)));
    }
    records
}
