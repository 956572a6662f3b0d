use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::models::{EntryFlag, Side, Trade, TradeSeries};

/// Terminal codes arrive either as integers or as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCode {
    Int(i64),
    Text(String),
}

impl RawCode {
    fn describe(&self) -> String {
        match self {
            RawCode::Int(n) => n.to_string(),
            RawCode::Text(s) => s.clone(),
        }
    }
}

/// Unix seconds or an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTime {
    Unix(i64),
    Text(String),
}

/// A deal or position exactly as the terminal connector hands it over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDeal {
    #[serde(default)]
    pub ticket: Option<i64>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, rename = "type")]
    pub side: Option<RawCode>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default, alias = "price_open")]
    pub price: Option<f64>,
    #[serde(default)]
    pub profit: Option<f64>,
    #[serde(default)]
    pub time: Option<RawTime>,
    #[serde(default)]
    pub entry: Option<RawCode>,
}

impl TryFrom<RawDeal> for Trade {
    type Error = AnalyticsError;

    fn try_from(raw: RawDeal) -> Result<Self, Self::Error> {
        let ticket = raw.ticket;
        let missing = |field: &'static str| AnalyticsError::MissingField { ticket, field };

        let symbol = raw
            .symbol
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| missing("symbol"))?;

        let side_code = raw.side.ok_or_else(|| missing("type"))?;
        let side = match &side_code {
            RawCode::Int(n) => Side::from_code(*n),
            RawCode::Text(s) => Side::from_str_loose(s),
        }
        .ok_or_else(|| AnalyticsError::UnknownCode {
            ticket,
            field: "type",
            code: side_code.describe(),
        })?;

        // Position snapshots carry no entry flag; they are open by definition.
        let entry = match raw.entry {
            None => EntryFlag::Open,
            Some(code) => match &code {
                RawCode::Int(n) => EntryFlag::from_code(*n),
                RawCode::Text(s) => match s.trim().to_ascii_uppercase().as_str() {
                    "OPEN" | "IN" | "0" => Some(EntryFlag::Open),
                    "CLOSE" | "OUT" | "1" => Some(EntryFlag::Close),
                    _ => None,
                },
            }
            .ok_or_else(|| AnalyticsError::UnknownCode {
                ticket,
                field: "entry",
                code: code.describe(),
            })?,
        };

        let timestamp = match raw.time.ok_or_else(|| missing("time"))? {
            RawTime::Unix(secs) => DateTime::from_timestamp(secs, 0).ok_or_else(|| {
                AnalyticsError::InvalidValue {
                    ticket,
                    field: "time",
                    value: secs.to_string(),
                }
            })?,
            RawTime::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| AnalyticsError::InvalidValue {
                    ticket,
                    field: "time",
                    value: s.clone(),
                })?,
        };

        let trade = Trade {
            ticket: ticket.ok_or_else(|| missing("ticket"))?,
            symbol,
            side,
            volume: raw.volume.ok_or_else(|| missing("volume"))?,
            price: raw.price.ok_or_else(|| missing("price"))?,
            profit: raw.profit.ok_or_else(|| missing("profit"))?,
            timestamp,
            entry,
        };
        trade.validate()?;
        Ok(trade)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub balance: f64,
    pub equity: f64,
}

/// On-disk/wire shape of one analysis request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeFeed {
    #[serde(default)]
    pub positions: Vec<RawDeal>,
    #[serde(default)]
    pub deals: Vec<RawDeal>,
    #[serde(default)]
    pub account: Option<AccountSnapshot>,
}

impl TradeFeed {
    /// Validates every record; the first malformed one aborts ingestion.
    pub fn normalize(self) -> Result<ReportInput, AnalyticsError> {
        let positions = self
            .positions
            .into_iter()
            .map(Trade::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let deals = self
            .deals
            .into_iter()
            .map(Trade::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReportInput {
            positions: TradeSeries::new(positions),
            deals: TradeSeries::new(deals),
            account: self.account,
        })
    }
}

/// Validated input to the report composer.
#[derive(Debug, Clone, Default)]
pub struct ReportInput {
    /// Live/open-position set.
    pub positions: TradeSeries,
    /// Deal history; only closing deals are analyzed.
    pub deals: TradeSeries,
    pub account: Option<AccountSnapshot>,
}

impl ReportInput {
    pub fn new(positions: TradeSeries, deals: TradeSeries) -> Self {
        Self {
            positions,
            deals,
            account: None,
        }
    }

    pub fn with_account(mut self, account: AccountSnapshot) -> Self {
        self.account = Some(account);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawDeal {
        RawDeal {
            ticket: Some(42),
            symbol: Some("XAUUSD".to_string()),
            side: Some(RawCode::Int(1)),
            volume: Some(0.05),
            price: Some(2010.5),
            profit: Some(-12.5),
            time: Some(RawTime::Unix(1_705_312_800)),
            entry: Some(RawCode::Int(1)),
        }
    }

    #[test]
    fn converts_terminal_codes() {
        let t = Trade::try_from(raw()).unwrap();
        assert_eq!(t.side, Side::Sell);
        assert_eq!(t.entry, EntryFlag::Close);
        assert_eq!(t.timestamp.to_rfc3339(), "2024-01-15T10:00:00+00:00");
    }

    #[test]
    fn missing_entry_means_open() {
        let mut r = raw();
        r.entry = None;
        assert_eq!(Trade::try_from(r).unwrap().entry, EntryFlag::Open);
    }

    #[test]
    fn rejects_missing_profit() {
        let mut r = raw();
        r.profit = None;
        assert_eq!(
            Trade::try_from(r).unwrap_err(),
            AnalyticsError::MissingField {
                ticket: Some(42),
                field: "profit"
            }
        );
    }

    #[test]
    fn rejects_unknown_side() {
        let mut r = raw();
        r.side = Some(RawCode::Text("HOLD".to_string()));
        assert!(matches!(
            Trade::try_from(r),
            Err(AnalyticsError::UnknownCode { field: "type", .. })
        ));
    }

    #[test]
    fn rejects_zero_volume() {
        let mut r = raw();
        r.volume = Some(0.0);
        assert!(matches!(
            Trade::try_from(r),
            Err(AnalyticsError::InvalidValue { field: "volume", .. })
        ));
    }

    #[test]
    fn parses_feed_json() {
        let json = r#"{
            "positions": [
                {"ticket": 1, "symbol": "EURUSD", "type": 0, "volume": 0.1,
                 "price_open": 1.0912, "profit": 4.2, "time": 1705312800}
            ],
            "deals": [
                {"ticket": 2, "symbol": "EURUSD", "type": "SELL", "volume": 0.1,
                 "price": 1.0950, "profit": -3.0, "time": "2024-01-15T12:00:00Z",
                 "entry": 1, "commission": -0.7}
            ],
            "account": {"balance": 1000.0, "equity": 1004.2}
        }"#;
        let feed: TradeFeed = serde_json::from_str(json).unwrap();
        let input = feed.normalize().unwrap();
        assert_eq!(input.positions.len(), 1);
        assert_eq!(input.deals.len(), 1);
        assert_eq!(input.deals[0].side, Side::Sell);
        assert!((input.positions[0].price - 1.0912).abs() < 1e-12);
        assert_eq!(input.account.map(|a| a.equity), Some(1004.2));
    }
}
