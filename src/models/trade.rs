use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::models::{EntryFlag, Side};

/// A single normalized execution record. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub ticket: i64,
    pub symbol: String,
    pub side: Side,
    pub volume: f64,
    pub price: f64,
    pub profit: f64,
    pub timestamp: DateTime<Utc>,
    pub entry: EntryFlag,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.profit < 0.0
    }

    pub fn is_closing(&self) -> bool {
        self.entry == EntryFlag::Close
    }

    /// UTC hour of day, 0..=23.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn weekday(&self) -> Weekday {
        self.timestamp.weekday()
    }

    /// Re-checks the invariants the analyzers rely on.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        let ticket = Some(self.ticket);
        if self.symbol.trim().is_empty() {
            return Err(AnalyticsError::MissingField {
                ticket,
                field: "symbol",
            });
        }
        if !self.volume.is_finite() || self.volume <= 0.0 {
            return Err(AnalyticsError::InvalidValue {
                ticket,
                field: "volume",
                value: self.volume.to_string(),
            });
        }
        if !self.price.is_finite() {
            return Err(AnalyticsError::InvalidValue {
                ticket,
                field: "price",
                value: self.price.to_string(),
            });
        }
        if !self.profit.is_finite() {
            return Err(AnalyticsError::InvalidValue {
                ticket,
                field: "profit",
                value: self.profit.to_string(),
            });
        }
        Ok(())
    }
}

/// Ordered collection of trades with the aggregate helpers the analyzers share.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSeries {
    trades: Vec<Trade>,
}

impl TradeSeries {
    pub fn new(trades: Vec<Trade>) -> Self {
        Self { trades }
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn first(&self) -> Option<&Trade> {
        self.trades.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trade> {
        self.trades.iter()
    }

    pub fn as_slice(&self) -> &[Trade] {
        &self.trades
    }

    pub fn push(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    /// Copy sorted oldest-first. Stable, so equal timestamps keep input order.
    pub fn chronological(&self) -> TradeSeries {
        let mut trades = self.trades.clone();
        trades.sort_by_key(|t| t.timestamp);
        TradeSeries::new(trades)
    }

    pub fn profits(&self) -> Vec<f64> {
        self.trades.iter().map(|t| t.profit).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.trades.iter().map(|t| t.volume).collect()
    }

    pub fn net_profit(&self) -> f64 {
        self.trades.iter().map(|t| t.profit).sum()
    }

    /// Deals that close a position (the history set).
    pub fn closed_deals(&self) -> TradeSeries {
        self.filter(|t| t.is_closing())
    }

    /// Deals that open a position (the live set).
    pub fn open_positions(&self) -> TradeSeries {
        self.filter(|t| !t.is_closing())
    }

    pub fn filter<F>(&self, predicate: F) -> TradeSeries
    where
        F: Fn(&Trade) -> bool,
    {
        TradeSeries::new(self.trades.iter().filter(|&t| predicate(t)).cloned().collect())
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        self.trades.iter().try_for_each(Trade::validate)
    }
}

impl std::ops::Index<usize> for TradeSeries {
    type Output = Trade;
    fn index(&self, index: usize) -> &Self::Output {
        &self.trades[index]
    }
}

impl<'a> IntoIterator for &'a TradeSeries {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;
    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}
