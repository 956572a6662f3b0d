use serde::{Deserialize, Serialize};

use crate::models::TradeSeries;

/// Longest run of strictly negative profits. Anything else breaks the run.
///
/// Used on the live position set for alerting.
pub fn max_consecutive_losses(chronological_profits: &[f64]) -> usize {
    let mut current = 0;
    let mut longest = 0;
    for &p in chronological_profits {
        if p < 0.0 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakStats {
    pub longest_win_streak: usize,
    pub longest_loss_streak: usize,
    /// Positive while on a winning run, negative while on a losing run.
    pub current_streak: i64,
}

impl StreakStats {
    /// Scans closed deals oldest-first. A zero profit extends the loss run.
    pub fn from_deals(deals: &TradeSeries) -> Self {
        Self::from_profits(&deals.chronological().profits())
    }

    pub fn from_profits(chronological_profits: &[f64]) -> Self {
        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut stats = StreakStats::default();

        for &p in chronological_profits {
            if p > 0.0 {
                wins += 1;
                losses = 0;
                stats.longest_win_streak = stats.longest_win_streak.max(wins);
            } else {
                losses += 1;
                wins = 0;
                stats.longest_loss_streak = stats.longest_loss_streak.max(losses);
            }
        }

        stats.current_streak = if wins > 0 {
            wins as i64
        } else {
            -(losses as i64)
        };
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_losses_three() {
        assert_eq!(max_consecutive_losses(&[-50.0, -60.0, -70.0]), 3);
    }

    #[test]
    fn consecutive_losses_reset_on_zero() {
        assert_eq!(max_consecutive_losses(&[-1.0, -1.0, 0.0, -1.0, 5.0]), 2);
        assert_eq!(max_consecutive_losses(&[]), 0);
    }

    #[test]
    fn historical_streaks() {
        let s = StreakStats::from_profits(&[10.0, 5.0, 3.0, -1.0, -2.0, 4.0]);
        assert_eq!(s.longest_win_streak, 3);
        assert_eq!(s.longest_loss_streak, 2);
        assert_eq!(s.current_streak, 1);
    }

    #[test]
    fn zero_profit_counts_as_loss_run() {
        let s = StreakStats::from_profits(&[-1.0, 0.0, 0.0, 2.0]);
        assert_eq!(s.longest_loss_streak, 3);
        assert_eq!(s.longest_win_streak, 1);
        // The live variant treats the same zeros as neutral.
        assert_eq!(max_consecutive_losses(&[-1.0, 0.0, 0.0, 2.0]), 1);
    }

    #[test]
    fn streaks_bounded_by_count() {
        let profits = [-3.0, -2.0, -1.0, 0.0];
        let s = StreakStats::from_profits(&profits);
        assert!(s.longest_loss_streak <= profits.len());
        assert_eq!(s.longest_loss_streak, 4);
        assert_eq!(s.current_streak, -4);
        assert_eq!(StreakStats::from_profits(&[]), StreakStats::default());
    }
}
