use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::core::stats::{mean, sample_std_dev};
use crate::models::{Side, TimeframeBand, TradeSeries};

/// Aggregate features the rule chain looks at. Nothing else influences the label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrategyFeatures {
    pub trade_count: usize,
    pub distinct_symbols: usize,
    /// Present when exactly one symbol is traded.
    pub sole_symbol: Option<String>,
    pub buy_ratio: f64,
    pub sell_ratio: f64,
    pub has_both_sides: bool,
    /// Rows repeating an earlier (symbol, open price) pair.
    pub duplicate_pairs: usize,
    pub avg_volume: f64,
    /// Sample std dev of profit; 0 below two trades.
    pub profit_std: f64,
    pub avg_gap_secs: f64,
}

impl StrategyFeatures {
    pub fn extract(trades: &TradeSeries) -> Self {
        if trades.is_empty() {
            return Self::default();
        }

        let ordered = trades.chronological();
        let n = ordered.len();

        let symbols: HashSet<&str> = ordered.iter().map(|t| t.symbol.as_str()).collect();
        let sole_symbol = if symbols.len() == 1 {
            ordered.first().map(|t| t.symbol.clone())
        } else {
            None
        };

        let buys = ordered.iter().filter(|t| t.side == Side::Buy).count();
        let sells = n - buys;

        let mut seen: HashSet<(&str, u64)> = HashSet::new();
        let duplicate_pairs = ordered
            .iter()
            .filter(|t| !seen.insert((t.symbol.as_str(), price_key(t.price))))
            .count();

        let gaps: Vec<f64> = ordered
            .as_slice()
            .windows(2)
            .map(|w| (w[1].timestamp - w[0].timestamp).num_milliseconds() as f64 / 1000.0)
            .collect();

        Self {
            trade_count: n,
            distinct_symbols: symbols.len(),
            sole_symbol,
            buy_ratio: buys as f64 / n as f64,
            sell_ratio: sells as f64 / n as f64,
            has_both_sides: buys > 0 && sells > 0,
            duplicate_pairs,
            avg_volume: mean(&ordered.volumes()),
            profit_std: sample_std_dev(&ordered.profits()).unwrap_or(0.0),
            avg_gap_secs: mean(&gaps),
        }
    }
}

fn price_key(price: f64) -> u64 {
    // -0.0 and 0.0 are the same open price
    if price == 0.0 {
        0.0_f64.to_bits()
    } else {
        price.to_bits()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    #[serde(rename = "No Trades")]
    NoTrades,
    #[serde(rename = "Grid/Scalping")]
    GridScalping,
    #[serde(rename = "Trend Following (Long Bias)")]
    TrendLong,
    #[serde(rename = "Trend Following (Short Bias)")]
    TrendShort,
    #[serde(rename = "Hedge Strategy")]
    Hedge,
    #[serde(rename = "Martingale / Averaging")]
    Martingale,
    #[serde(rename = "Mixed / Adaptive")]
    Mixed,
}

impl StrategyKind {
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::NoTrades => "No Trades",
            StrategyKind::GridScalping => "Grid/Scalping",
            StrategyKind::TrendLong => "Trend Following (Long Bias)",
            StrategyKind::TrendShort => "Trend Following (Short Bias)",
            StrategyKind::Hedge => "Hedge Strategy",
            StrategyKind::Martingale => "Martingale / Averaging",
            StrategyKind::Mixed => "Mixed / Adaptive",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::NoTrades => "No open positions to analyze",
            StrategyKind::GridScalping => {
                "Grid or scalping strategy with multiple positions at the same price"
            }
            StrategyKind::TrendLong => "Bullish trend following",
            StrategyKind::TrendShort => "Bearish trend following",
            StrategyKind::Hedge => "Hedging strategy with opposing positions",
            StrategyKind::Martingale => "Martingale or averaging strategy",
            StrategyKind::Mixed => "Mixed or adaptive strategy",
        }
    }

    pub fn indicators(&self) -> &'static [&'static str] {
        match self {
            StrategyKind::NoTrades => &[],
            StrategyKind::GridScalping => &[
                "Support/Resistance levels",
                "Moving Averages",
                "Bollinger Bands",
            ],
            StrategyKind::TrendLong | StrategyKind::TrendShort => {
                &["Moving Averages (50, 200)", "MACD", "ADX"]
            }
            StrategyKind::Hedge => &["Correlation analysis", "Volatility indicators"],
            StrategyKind::Martingale => &["Risk management tools", "Position sizing"],
            StrategyKind::Mixed => &["Multiple indicators", "Market conditions"],
        }
    }

    pub fn explanation(&self, f: &StrategyFeatures) -> String {
        let symbol = f.sole_symbol.as_deref().unwrap_or("the traded symbol");
        match self {
            StrategyKind::NoTrades => "No active trades on the account".to_string(),
            StrategyKind::GridScalping => format!(
                "Detected {} duplicated positions on {}. Orders are stacked at \
                 support/resistance levels to capture small price moves.",
                f.duplicate_pairs, symbol
            ),
            StrategyKind::TrendLong => format!(
                "{:.1}% of positions are BUY. The strategy follows bullish trends \
                 using momentum indicators.",
                f.buy_ratio * 100.0
            ),
            StrategyKind::TrendShort => format!(
                "{:.1}% of positions are SELL. The strategy follows bearish trends \
                 using momentum indicators.",
                f.sell_ratio * 100.0
            ),
            StrategyKind::Hedge => format!(
                "BUY and SELL positions on {}. Risk is reduced by holding opposing positions.",
                symbol
            ),
            StrategyKind::Martingale => format!(
                "High profit volatility (std: {:.2}) with average volume {:.2}. \
                 Positions are added while losing in order to recover.",
                f.profit_std, f.avg_volume
            ),
            StrategyKind::Mixed => "No clear pattern identified. Possibly an adaptive \
                                    strategy combining several approaches."
                .to_string(),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

struct Rule {
    kind: StrategyKind,
    matches: fn(&StrategyFeatures) -> bool,
}

fn is_grid(f: &StrategyFeatures) -> bool {
    f.duplicate_pairs > 1 && f.distinct_symbols == 1
}

fn is_long_bias(f: &StrategyFeatures) -> bool {
    f.buy_ratio > 0.9
}

fn is_short_bias(f: &StrategyFeatures) -> bool {
    f.sell_ratio > 0.9
}

fn is_hedge(f: &StrategyFeatures) -> bool {
    f.distinct_symbols == 1 && f.has_both_sides
}

fn is_martingale(f: &StrategyFeatures) -> bool {
    f.profit_std > 5.0 && f.avg_volume > 0.2
}

/// Evaluated top to bottom, first match wins. Order is precedence.
const RULES: &[Rule] = &[
    Rule {
        kind: StrategyKind::GridScalping,
        matches: is_grid,
    },
    Rule {
        kind: StrategyKind::TrendLong,
        matches: is_long_bias,
    },
    Rule {
        kind: StrategyKind::TrendShort,
        matches: is_short_bias,
    },
    Rule {
        kind: StrategyKind::Hedge,
        matches: is_hedge,
    },
    Rule {
        kind: StrategyKind::Martingale,
        matches: is_martingale,
    },
];

/// Pure function of the feature tuple. `NoTrades` only for an empty set.
pub fn classify_features(features: &StrategyFeatures) -> StrategyKind {
    if features.trade_count == 0 {
        return StrategyKind::NoTrades;
    }
    RULES
        .iter()
        .find(|rule| (rule.matches)(features))
        .map(|rule| rule.kind)
        .unwrap_or(StrategyKind::Mixed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    #[default]
    RuleBased,
    Enriched,
}

/// Label plus the metadata bundle attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: StrategyKind,
    pub strategy: String,
    pub strategy_description: String,
    pub timeframe: TimeframeBand,
    pub indicators: Vec<String>,
    pub explanation: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub source: ClassificationSource,
}

pub struct StrategyClassifier;

impl StrategyClassifier {
    pub fn classify(trades: &TradeSeries) -> Classification {
        let features = StrategyFeatures::extract(trades);
        Self::from_features(&features)
    }

    pub fn from_features(features: &StrategyFeatures) -> Classification {
        let kind = classify_features(features);
        let timeframe = if kind == StrategyKind::NoTrades {
            TimeframeBand::NotApplicable
        } else {
            TimeframeBand::from_avg_gap_secs(features.avg_gap_secs)
        };

        Classification {
            kind,
            strategy: kind.label().to_string(),
            strategy_description: kind.description().to_string(),
            timeframe,
            indicators: kind.indicators().iter().map(|s| s.to_string()).collect(),
            explanation: kind.explanation(features),
            confidence: None,
            source: ClassificationSource::RuleBased,
        }
    }
}
