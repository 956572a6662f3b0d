use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::buckets::{best_key, group_by, worst_key, BucketStats};
use crate::models::TradeSeries;

/// Placeholder for best/worst symbol when there are no deals.
pub const NO_SYMBOL: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SymbolStats {
    #[serde(flatten)]
    pub totals: BucketStats,
    pub best_trade: f64,
    pub worst_trade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolReport {
    pub symbols: BTreeMap<String, SymbolStats>,
    pub best_symbol: String,
    pub worst_symbol: String,
}

impl Default for SymbolReport {
    fn default() -> Self {
        Self {
            symbols: BTreeMap::new(),
            best_symbol: NO_SYMBOL.to_string(),
            worst_symbol: NO_SYMBOL.to_string(),
        }
    }
}

impl SymbolReport {
    pub fn from_deals(deals: &TradeSeries) -> Self {
        let totals = group_by(deals.iter(), |t| t.symbol.clone());

        let mut extremes: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for t in deals {
            let (best, worst) = extremes
                .entry(t.symbol.as_str())
                .or_insert((f64::NEG_INFINITY, f64::INFINITY));
            *best = best.max(t.profit);
            *worst = worst.min(t.profit);
        }

        let symbols = totals
            .iter()
            .map(|(symbol, stats)| {
                let (best_trade, worst_trade) = extremes
                    .get(symbol.as_str())
                    .copied()
                    .unwrap_or((0.0, 0.0));
                (
                    symbol.clone(),
                    SymbolStats {
                        totals: *stats,
                        best_trade,
                        worst_trade,
                    },
                )
            })
            .collect();

        // Lowest symbol wins ties.
        Self {
            best_symbol: best_key(&totals).unwrap_or_else(|| NO_SYMBOL.to_string()),
            worst_symbol: worst_key(&totals).unwrap_or_else(|| NO_SYMBOL.to_string()),
            symbols,
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolStats> {
        self.symbols.get(symbol)
    }

    pub fn total_profit(&self) -> f64 {
        self.symbols.values().map(|s| s.totals.total_profit).sum()
    }
}
