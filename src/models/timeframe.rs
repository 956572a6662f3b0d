use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart timeframe band inferred from the average gap between trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeframeBand {
    #[serde(rename = "M1-M5")]
    M1M5,
    #[serde(rename = "M15-H1")]
    M15H1,
    #[serde(rename = "H4-D1")]
    H4D1,
    #[serde(rename = "D1+")]
    D1Plus,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl TimeframeBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeframeBand::M1M5 => "M1-M5",
            TimeframeBand::M15H1 => "M15-H1",
            TimeframeBand::H4D1 => "H4-D1",
            TimeframeBand::D1Plus => "D1+",
            TimeframeBand::NotApplicable => "N/A",
        }
    }

    /// Upper bounds are exclusive: <300s, <3600s, <86400s, else D1+.
    pub fn from_avg_gap_secs(gap: f64) -> TimeframeBand {
        if gap < 300.0 {
            TimeframeBand::M1M5
        } else if gap < 3600.0 {
            TimeframeBand::M15H1
        } else if gap < 86400.0 {
            TimeframeBand::H4D1
        } else {
            TimeframeBand::D1Plus
        }
    }
}

impl fmt::Display for TimeframeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
