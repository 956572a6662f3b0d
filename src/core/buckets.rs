//! Group-by aggregation over trades, keyed by any ordered bucket.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::stats::percent;
use crate::models::Trade;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketStats {
    pub total_profit: f64,
    pub avg_profit: f64,
    pub trade_count: usize,
    pub win_rate: f64,
}

#[derive(Debug, Default)]
struct Accumulator {
    total: f64,
    count: usize,
    wins: usize,
}

impl Accumulator {
    fn finish(&self) -> BucketStats {
        BucketStats {
            total_profit: self.total,
            avg_profit: if self.count > 0 {
                self.total / self.count as f64
            } else {
                0.0
            },
            trade_count: self.count,
            win_rate: percent(self.wins, self.count),
        }
    }
}

/// Sums profit per key. Only keys that received at least one trade appear.
pub fn group_by<'a, K, I, F>(trades: I, key: F) -> BTreeMap<K, BucketStats>
where
    K: Ord,
    I: IntoIterator<Item = &'a Trade>,
    F: Fn(&Trade) -> K,
{
    let mut acc: BTreeMap<K, Accumulator> = BTreeMap::new();
    for t in trades {
        let entry = acc.entry(key(t)).or_default();
        entry.total += t.profit;
        entry.count += 1;
        if t.is_win() {
            entry.wins += 1;
        }
    }
    acc.into_iter().map(|(k, a)| (k, a.finish())).collect()
}

/// Key with the highest total profit. Ties go to the lowest key.
pub fn best_key<K: Ord + Clone>(buckets: &BTreeMap<K, BucketStats>) -> Option<K> {
    let mut best: Option<(&K, f64)> = None;
    for (k, s) in buckets {
        match best {
            Some((_, total)) if s.total_profit <= total => {}
            _ => best = Some((k, s.total_profit)),
        }
    }
    best.map(|(k, _)| k.clone())
}

/// Key with the lowest total profit. Ties go to the lowest key.
pub fn worst_key<K: Ord + Clone>(buckets: &BTreeMap<K, BucketStats>) -> Option<K> {
    let mut worst: Option<(&K, f64)> = None;
    for (k, s) in buckets {
        match worst {
            Some((_, total)) if s.total_profit >= total => {}
            _ => worst = Some((k, s.total_profit)),
        }
    }
    worst.map(|(k, _)| k.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_trades;

    fn stats(total: f64) -> BucketStats {
        BucketStats {
            total_profit: total,
            ..Default::default()
        }
    }

    #[test]
    fn groups_and_counts() {
        let trades = make_trades(&[10.0, -4.0, 6.0, 0.0]);
        let by_parity = group_by(trades.iter(), |t| t.ticket % 2);
        // tickets are 1..=4
        let odd = by_parity[&1];
        assert_eq!(odd.trade_count, 2);
        assert!((odd.total_profit - 16.0).abs() < 1e-9);
        assert!((odd.win_rate - 100.0).abs() < 1e-9);
        let even = by_parity[&0];
        assert!((even.avg_profit + 2.0).abs() < 1e-9);
        assert_eq!(even.win_rate, 0.0);
    }

    #[test]
    fn ties_resolve_to_lowest_key() {
        let mut m = BTreeMap::new();
        m.insert("b", stats(5.0));
        m.insert("a", stats(5.0));
        m.insert("c", stats(-1.0));
        m.insert("d", stats(-1.0));
        assert_eq!(best_key(&m), Some("a"));
        assert_eq!(worst_key(&m), Some("c"));
    }

    #[test]
    fn empty_has_no_best() {
        let m: BTreeMap<u32, BucketStats> = BTreeMap::new();
        assert_eq!(best_key(&m), None);
        assert_eq!(worst_key(&m), None);
    }
}
