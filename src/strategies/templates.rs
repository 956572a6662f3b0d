use serde::{Deserialize, Serialize};
use std::fmt;

/// Which code template the template collaborator should render for a label.
///
/// Resolution is by case-insensitive substring, so enriched labels that
/// do not match a rule-based label verbatim still resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKey {
    GridScalping,
    TrendLong,
    TrendShort,
    Hedge,
    Martingale,
}

impl TemplateKey {
    pub fn from_label(label: &str) -> Option<TemplateKey> {
        let l = label.to_lowercase();
        let trend = l.contains("trend following");

        if l.contains("grid") || l.contains("scalping") {
            Some(TemplateKey::GridScalping)
        } else if trend && (l.contains("long") || l.contains("buy")) {
            Some(TemplateKey::TrendLong)
        } else if trend && (l.contains("short") || l.contains("sell")) {
            Some(TemplateKey::TrendShort)
        } else if l.contains("hedge") {
            Some(TemplateKey::Hedge)
        } else if l.contains("martingale") || l.contains("averaging") {
            Some(TemplateKey::Martingale)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKey::GridScalping => "grid_scalping",
            TemplateKey::TrendLong => "trend_long",
            TemplateKey::TrendShort => "trend_short",
            TemplateKey::Hedge => "hedge",
            TemplateKey::Martingale => "martingale",
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
