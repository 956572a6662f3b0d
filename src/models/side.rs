use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    /// Terminal order-type code: 0 = buy, 1 = sell.
    pub fn from_code(code: i64) -> Option<Side> {
        match code {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Side> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" | "0" => Some(Side::Buy),
            "SELL" | "1" => Some(Side::Sell),
            _ => None,
        }
    }
}

/// Distinguishes the opening half of a position from its closing half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryFlag {
    Open,
    Close,
}

impl fmt::Display for EntryFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryFlag::Open => write!(f, "OPEN"),
            EntryFlag::Close => write!(f, "CLOSE"),
        }
    }
}

impl EntryFlag {
    /// Terminal deal-entry code: 0 = in, 1 = out.
    pub fn from_code(code: i64) -> Option<EntryFlag> {
        match code {
            0 => Some(EntryFlag::Open),
            1 => Some(EntryFlag::Close),
            _ => None,
        }
    }
}
