use chrono::{DateTime, Duration, Utc};
use trade_insight::models::{EntryFlag, Side, Trade, TradeSeries};

pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .unwrap()
        .with_timezone(&Utc)
}

/// Builds trades from (symbol, side, volume, price, profit) tuples, one minute apart.
pub fn make_series(rows: &[(&str, Side, f64, f64, f64)]) -> TradeSeries {
    let base = utc("2024-01-15T12:00:00Z");

    let trades: Vec<Trade> = rows
        .iter()
        .enumerate()
        .map(|(i, &(symbol, side, volume, price, profit))| Trade {
            ticket: i as i64 + 1,
            symbol: symbol.to_string(),
            side,
            volume,
            price,
            profit,
            timestamp: base + Duration::minutes(i as i64),
            entry: EntryFlag::Open,
        })
        .collect();

    TradeSeries::new(trades)
}

/// EURUSD buys with distinct prices so no duplicate pairs appear.
pub fn make_profits(profits: &[f64]) -> TradeSeries {
    let rows: Vec<(&str, Side, f64, f64, f64)> = profits
        .iter()
        .enumerate()
        .map(|(i, &p)| ("EURUSD", Side::Buy, 0.1, 1.1 + i as f64 * 0.001, p))
        .collect();
    make_series(&rows)
}

/// Closing deals at explicit instants: (symbol, profit, rfc3339).
pub fn make_history(rows: &[(&str, f64, &str)]) -> TradeSeries {
    let trades: Vec<Trade> = rows
        .iter()
        .enumerate()
        .map(|(i, &(symbol, profit, at))| Trade {
            ticket: 1000 + i as i64,
            symbol: symbol.to_string(),
            side: if i % 2 == 0 { Side::Buy } else { Side::Sell },
            volume: 0.2,
            price: 1.0,
            profit,
            timestamp: utc(at),
            entry: EntryFlag::Close,
        })
        .collect();
    TradeSeries::new(trades)
}
