//! Accumulated fetch results keyed by symbol.

use std::collections::HashMap;

use crate::models::Kline;

/// Symbol -> ordered kline sequence, preserving insertion order.
///
/// The batch scheduler inserts entries batch by batch in universe order, so
/// insertion order equals discovery order. An entry, once written, is never
/// overwritten; symbols whose fetch permanently failed are absent rather than
/// present with an empty sequence.
#[derive(Debug, Clone, Default)]
pub struct HistoricalDataset {
    order: Vec<String>,
    data: HashMap<String, Vec<Kline>>,
}

impl HistoricalDataset {
    /// Create an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol's klines. The first write for a symbol wins.
    pub fn insert(&mut self, symbol: String, klines: Vec<Kline>) {
        if self.data.contains_key(&symbol) {
            tracing::warn!(symbol = %symbol, "Duplicate dataset insert ignored");
            return;
        }
        self.order.push(symbol.clone());
        self.data.insert(symbol, klines);
    }

    /// Klines for `symbol`, if the fetch produced usable data.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&[Kline]> {
        self.data.get(symbol).map(Vec::as_slice)
    }

    /// Whether `symbol` has an entry.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.data.contains_key(symbol)
    }

    /// Number of symbols with data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no symbol produced data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Kline])> {
        self.order
            .iter()
            .filter_map(|symbol| self.data.get(symbol).map(|k| (symbol.as_str(), k.as_slice())))
    }

    /// Symbols in insertion order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
