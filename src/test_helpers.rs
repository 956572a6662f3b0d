use chrono::{DateTime, Duration, Utc};

use crate::config::{AnalysisOptions, Config, EnrichmentConfig};
use crate::models::{EntryFlag, Side, Trade, TradeSeries};

const BASE_TIME: &str = "2024-01-15T12:00:00Z";

pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// One opening trade `offset_secs` after the shared base time.
pub fn make_trade(
    ticket: i64,
    symbol: &str,
    side: Side,
    volume: f64,
    price: f64,
    profit: f64,
    offset_secs: i64,
) -> Trade {
    Trade {
        ticket,
        symbol: symbol.to_string(),
        side,
        volume,
        price,
        profit,
        timestamp: utc(BASE_TIME) + Duration::seconds(offset_secs),
        entry: EntryFlag::Open,
    }
}

/// EURUSD buys, 0.1 lots at 1.1, one minute apart, tickets from 1.
pub fn make_trades(profits: &[f64]) -> TradeSeries {
    let trades: Vec<Trade> = profits
        .iter()
        .enumerate()
        .map(|(i, &p)| make_trade(i as i64 + 1, "EURUSD", Side::Buy, 0.1, 1.1, p, i as i64 * 60))
        .collect();
    TradeSeries::new(trades)
}

/// Opening trade at an explicit RFC 3339 instant.
pub fn make_trade_at(ticket: i64, symbol: &str, side: Side, profit: f64, at: &str) -> Trade {
    Trade {
        timestamp: utc(at),
        ..make_trade(ticket, symbol, side, 0.1, 1.1, profit, 0)
    }
}

/// Marks a trade as a closing deal.
pub fn closed(trade: Trade) -> Trade {
    Trade {
        entry: EntryFlag::Close,
        ..trade
    }
}

/// A Config suitable for testing: default analysis options, enrichment off.
pub fn default_test_config() -> Config {
    Config {
        trades_file: "trades.json".to_string(),
        report_dir: std::env::temp_dir()
            .join("trade_insight_test_reports")
            .to_string_lossy()
            .to_string(),
        options: AnalysisOptions::default(),
        enrichment: EnrichmentConfig {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1500,
            timeout_secs: 30,
        },
        log_level: "DEBUG".to_string(),
    }
}
