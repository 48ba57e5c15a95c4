//! Ranking metric types.

use serde::{Deserialize, Serialize};

/// A symbol paired with its summed traded volume over the harvest window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolVolume {
    /// Instrument symbol.
    pub symbol: String,
    /// Sum of the `volume` field across the symbol's klines.
    pub total_volume: f64,
}
