use serde::{Deserialize, Serialize};

use crate::config::{AnalysisOptions, NoLossPolicy};
use crate::core::stats::{mean, percent, sample_std_dev};
use crate::models::TradeSeries;

/// Aggregate performance figures over one trade set.
///
/// `max_drawdown` is computed over the chronological ordering of the set and
/// is meaningless for any other ordering.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_trades: usize,
    pub net_profit: f64,
    pub avg_profit: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
}

impl PerformanceMetrics {
    pub fn calculate(trades: &TradeSeries, options: &AnalysisOptions) -> Self {
        if trades.is_empty() {
            return Self::default();
        }

        let ordered = trades.chronological();
        let profits = ordered.profits();

        Self {
            total_trades: profits.len(),
            net_profit: profits.iter().sum(),
            avg_profit: mean(&profits),
            win_rate: win_rate(&profits),
            profit_factor: profit_factor(&profits, options.profit_factor_no_loss),
            max_drawdown: max_drawdown(&profits),
            sharpe_ratio: sharpe_ratio(&profits),
        }
    }
}

/// Percent of trades with profit > 0.
pub fn win_rate(profits: &[f64]) -> f64 {
    let wins = profits.iter().filter(|&&p| p > 0.0).count();
    percent(wins, profits.len())
}

/// Gross profit over absolute gross loss.
pub fn profit_factor(profits: &[f64], policy: NoLossPolicy) -> f64 {
    let gross_win: f64 = profits.iter().filter(|&&p| p > 0.0).sum();
    let gross_loss: f64 = profits.iter().filter(|&&p| p < 0.0).sum::<f64>().abs();

    if gross_loss > 0.0 {
        return gross_win / gross_loss;
    }
    match policy {
        NoLossPolicy::Zero => 0.0,
        NoLossPolicy::Gross => gross_win,
    }
}

/// Largest decline of cumulative profit from its running peak.
/// The peak starts at the first cumulative value, not at zero.
pub fn max_drawdown(chronological_profits: &[f64]) -> f64 {
    let mut cumulative = 0.0;
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd: f64 = 0.0;

    for p in chronological_profits {
        cumulative += p;
        peak = peak.max(cumulative);
        max_dd = max_dd.max(peak - cumulative);
    }
    max_dd
}

/// Unannualized mean / sample standard deviation of per-trade profit.
pub fn sharpe_ratio(profits: &[f64]) -> f64 {
    match sample_std_dev(profits) {
        Some(sd) if sd > 0.0 => mean(profits) / sd,
        _ => 0.0,
    }
}
