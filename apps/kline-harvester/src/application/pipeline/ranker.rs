//! Volume aggregation and ranking.

use crate::models::{HistoricalDataset, SymbolVolume};

/// Rank every symbol in the dataset by summed traded volume, descending.
///
/// The sort is stable, so symbols with equal totals keep their dataset
/// insertion order (which is discovery order). No truncation happens here;
/// the top-K cutoff is the caller's concern.
#[must_use]
pub fn rank(dataset: &HistoricalDataset) -> Vec<SymbolVolume> {
    let mut totals: Vec<SymbolVolume> = dataset
        .iter()
        .map(|(symbol, klines)| SymbolVolume {
            symbol: symbol.to_string(),
            total_volume: klines.iter().map(|k| k.volume).sum(),
        })
        .collect();

    totals.sort_by(|a, b| b.total_volume.total_cmp(&a.total_volume));
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Kline;

    fn kline(volume: f64) -> Kline {
        Kline {
            open_time: 0,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume,
            close_time: 59_999,
            quote_asset_volume: volume,
            trade_count: 1,
            taker_buy_base_volume: 0.0,
            taker_buy_quote_volume: 0.0,
        }
    }

    fn dataset(entries: &[(&str, &[f64])]) -> HistoricalDataset {
        let mut dataset = HistoricalDataset::new();
        for (symbol, volumes) in entries {
            dataset.insert(
                (*symbol).to_string(),
                volumes.iter().map(|v| kline(*v)).collect(),
            );
        }
        dataset
    }

    #[test]
    fn sums_volume_across_klines() {
        let dataset = dataset(&[("A", &[1.0, 2.0, 3.0])]);
        let ranked = rank(&dataset);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].total_volume, 6.0);
    }

    #[test]
    fn sorts_descending_by_total_volume() {
        let dataset = dataset(&[("LOW", &[1.0]), ("HIGH", &[100.0]), ("MID", &[10.0])]);
        let ranked = rank(&dataset);
        let order: Vec<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["HIGH", "MID", "LOW"]);
    }

    #[test]
    fn ties_keep_discovery_order() {
        let dataset = dataset(&[
            ("FIRST", &[5.0]),
            ("BIG", &[50.0]),
            ("SECOND", &[5.0]),
            ("THIRD", &[2.0, 3.0]),
        ]);
        let ranked = rank(&dataset);
        let order: Vec<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["BIG", "FIRST", "SECOND", "THIRD"]);
    }

    #[test]
    fn empty_dataset_ranks_to_nothing() {
        assert!(rank(&HistoricalDataset::new()).is_empty());
    }
}
