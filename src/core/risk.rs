use serde::{Deserialize, Serialize};

use crate::config::AnalysisOptions;
use crate::core::stats::{mean, sample_std_dev};
use crate::models::TradeSeries;

/// Notional capital the risk-percent heuristic is measured against.
const REFERENCE_CAPITAL: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskReport {
    pub avg_win: f64,
    /// Mean absolute loss. Falls back to `AnalysisOptions::avg_loss_fallback`
    /// when there are no losing deals; not a real risk figure in that case.
    pub avg_loss: f64,
    pub avg_rr: f64,
    /// Profit spread as a percent of a fixed 10,000 notional.
    pub risk_percent: f64,
    /// Sum of volumes in the window. Not time-weighted.
    pub max_exposure: f64,
}

impl RiskReport {
    pub fn from_deals(deals: &TradeSeries, options: &AnalysisOptions) -> Self {
        let wins: Vec<f64> = deals.iter().filter(|t| t.is_win()).map(|t| t.profit).collect();
        let losses: Vec<f64> = deals
            .iter()
            .filter(|t| t.is_loss())
            .map(|t| t.profit.abs())
            .collect();

        let avg_win = mean(&wins);
        let avg_loss = if losses.is_empty() {
            options.avg_loss_fallback
        } else {
            mean(&losses)
        };
        let avg_rr = if avg_loss > 0.0 { avg_win / avg_loss } else { 0.0 };

        let risk_percent = sample_std_dev(&deals.profits())
            .map(|sd| sd / REFERENCE_CAPITAL * 100.0)
            .unwrap_or(0.0);

        Self {
            avg_win,
            avg_loss,
            avg_rr,
            risk_percent,
            max_exposure: deals.volumes().iter().sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Side;
    use crate::test_helpers::{make_trade, make_trades};

    #[test]
    fn averages_and_ratio() {
        let deals = make_trades(&[100.0, 50.0, -25.0, -75.0]);
        let r = RiskReport::from_deals(&deals, &AnalysisOptions::default());
        assert!((r.avg_win - 75.0).abs() < 1e-9);
        assert!((r.avg_loss - 50.0).abs() < 1e-9);
        assert!((r.avg_rr - 1.5).abs() < 1e-9);
    }

    #[test]
    fn no_losses_uses_fallback() {
        let deals = make_trades(&[10.0, 30.0]);
        let r = RiskReport::from_deals(&deals, &AnalysisOptions::default());
        assert!((r.avg_loss - 1.0).abs() < 1e-9);
        assert!((r.avg_rr - 20.0).abs() < 1e-9);

        let opts = AnalysisOptions {
            avg_loss_fallback: 4.0,
            ..Default::default()
        };
        let r = RiskReport::from_deals(&deals, &opts);
        assert!((r.avg_rr - 5.0).abs() < 1e-9);
    }

    #[test]
    fn risk_percent_from_std_dev() {
        // sample sd of [10, -10, 30] is 20 -> 20 / 10000 * 100 = 0.2
        let deals = make_trades(&[10.0, -10.0, 30.0]);
        let r = RiskReport::from_deals(&deals, &AnalysisOptions::default());
        assert!((r.risk_percent - 0.2).abs() < 1e-9);
    }

    #[test]
    fn exposure_sums_volumes() {
        let deals = TradeSeries::new(vec![
            make_trade(1, "EURUSD", Side::Buy, 0.5, 1.1, 1.0, 0),
            make_trade(2, "GBPUSD", Side::Sell, 1.25, 1.3, -1.0, 60),
        ]);
        let r = RiskReport::from_deals(&deals, &AnalysisOptions::default());
        assert!((r.max_exposure - 1.75).abs() < 1e-9);
    }

    #[test]
    fn empty_window() {
        let r = RiskReport::from_deals(&TradeSeries::default(), &AnalysisOptions::default());
        assert_eq!(r.avg_win, 0.0);
        assert_eq!(r.avg_rr, 0.0);
        assert_eq!(r.risk_percent, 0.0);
        assert_eq!(r.max_exposure, 0.0);
    }
}
