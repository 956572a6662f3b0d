use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::buckets::{best_key, group_by, worst_key, BucketStats};
use crate::models::TradeSeries;

/// Fixed UTC-hour windows. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TradingSession {
    /// [00:00, 08:00) UTC
    Asian,
    /// [08:00, 16:00) UTC
    London,
    /// [16:00, 24:00) UTC
    #[serde(rename = "New York")]
    NewYork,
}

impl TradingSession {
    pub fn from_hour(hour: u32) -> TradingSession {
        [TradingSession::Asian, TradingSession::London]
            .into_iter()
            .find(|s| hour < s.hours().1)
            .unwrap_or(TradingSession::NewYork)
    }

    pub fn at(time: DateTime<Utc>) -> TradingSession {
        Self::from_hour(time.hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradingSession::Asian => "Asian",
            TradingSession::London => "London",
            TradingSession::NewYork => "New York",
        }
    }

    /// Half-open UTC hour range `[start, end)`.
    pub fn hours(&self) -> (u32, u32) {
        match self {
            TradingSession::Asian => (0, 8),
            TradingSession::London => (8, 16),
            TradingSession::NewYork => (16, 24),
        }
    }
}

impl fmt::Display for TradingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionReport {
    pub sessions: BTreeMap<TradingSession, BucketStats>,
    pub best_session: Option<TradingSession>,
    pub worst_session: Option<TradingSession>,
}

impl SessionReport {
    pub fn from_deals(deals: &TradeSeries) -> Self {
        let sessions = group_by(deals.iter(), |t| TradingSession::at(t.timestamp));
        Self {
            best_session: best_key(&sessions),
            worst_session: worst_key(&sessions),
            sessions,
        }
    }

    pub fn total_profit(&self) -> f64 {
        self.sessions.values().map(|s| s.total_profit).sum()
    }
}
