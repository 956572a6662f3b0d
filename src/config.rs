use serde::{Deserialize, Serialize};

/// What profit factor reports when the window has no losing trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoLossPolicy {
    /// 0 regardless of wins (historical behavior).
    #[default]
    Zero,
    /// Gross winning profit, i.e. a loss sum treated as 1.
    Gross,
}

impl NoLossPolicy {
    pub fn from_str_loose(s: &str) -> Option<NoLossPolicy> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Some(NoLossPolicy::Zero),
            "gross" => Some(NoLossPolicy::Gross),
            _ => None,
        }
    }
}

/// Knobs for the numeric placeholders whose policy is still a product decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub profit_factor_no_loss: NoLossPolicy,
    /// `avg_loss` used when there are no losing deals.
    pub avg_loss_fallback: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            profit_factor_no_loss: NoLossPolicy::Zero,
            avg_loss_fallback: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl EnrichmentConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Input / output
    pub trades_file: String,
    pub report_dir: String,

    // Analysis
    pub options: AnalysisOptions,

    // Enrichment collaborator
    pub enrichment: EnrichmentConfig,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let options = AnalysisOptions {
            profit_factor_no_loss: NoLossPolicy::from_str_loose(&env(
                "PROFIT_FACTOR_NO_LOSS",
                "zero",
            ))
            .unwrap_or_default(),
            avg_loss_fallback: env("AVG_LOSS_FALLBACK", "1.0")
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite() && *v > 0.0)
                .unwrap_or(1.0),
        };

        Config {
            trades_file: env("TRADES_FILE", "trades.json"),
            report_dir: env("REPORT_DIR", "reports"),
            options,
            enrichment: EnrichmentConfig {
                api_key: env("OPENAI_API_KEY", ""),
                base_url: env("OPENAI_BASE_URL", "https://api.openai.com/v1"),
                model: env("OPENAI_MODEL", "gpt-4o-mini"),
                max_tokens: env("OPENAI_MAX_TOKENS", "1500").parse().unwrap_or(1500),
                timeout_secs: env("ENRICHMENT_TIMEOUT_SECS", "30").parse().unwrap_or(30),
            },
            log_level: env("LOG_LEVEL", "INFO"),
        }
    }
}
