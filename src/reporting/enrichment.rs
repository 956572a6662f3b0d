use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::EnrichmentConfig;
use crate::error::EnrichmentError;
use crate::models::{Side, Trade};
use crate::reporting::report::{Report, Summary};
use crate::strategies::classifier::StrategyKind;

const SYSTEM_PROMPT: &str = "You are a quantitative trading analyst with deep experience in \
Forex, CFDs and algorithmic strategies. Identify the strategy behind the trading data you are \
given and answer with a single JSON object.";

/// Descriptive fields an enricher may substitute. Numbers are never part of it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnrichmentOverride {
    #[serde(default)]
    pub strategy_name: String,
    #[serde(default)]
    pub strategy_description: String,
    #[serde(default, alias = "indicators_detected")]
    pub indicators: Vec<String>,
    #[serde(default, alias = "confidence_score")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum CollaboratorStatus {
    Applied,
    Skipped,
    Unavailable(String),
}

impl fmt::Display for CollaboratorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollaboratorStatus::Applied => write!(f, "applied"),
            CollaboratorStatus::Skipped => write!(f, "skipped"),
            CollaboratorStatus::Unavailable(reason) => write!(f, "unavailable: {}", reason),
        }
    }
}

/// Optional second opinion on the strategy label.
///
/// `Ok(None)` means the enricher had nothing to add.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(
        &self,
        summary: &Summary,
        trades: &[Trade],
    ) -> Result<Option<EnrichmentOverride>, EnrichmentError>;

    fn name(&self) -> &str;
}

/// Applies an enricher to a finished report. Never fails: any error leaves
/// the rule-based report as it was.
pub async fn enrich_report(
    report: Report,
    trades: &[Trade],
    enricher: Option<&dyn Enricher>,
) -> (Report, CollaboratorStatus) {
    let Some(enricher) = enricher else {
        debug!("No enricher configured");
        return (report, CollaboratorStatus::Skipped);
    };

    if trades.is_empty() || report.summary().classification.kind == StrategyKind::NoTrades {
        debug!("Nothing to enrich on an empty live set");
        return (report, CollaboratorStatus::Skipped);
    }

    match enricher.enrich(report.summary(), trades).await {
        Ok(Some(ov)) => {
            info!(
                "{} relabeled strategy: {} -> {}",
                enricher.name(),
                report.summary().classification.strategy,
                ov.strategy_name
            );
            (report.with_enrichment(ov), CollaboratorStatus::Applied)
        }
        Ok(None) => (report, CollaboratorStatus::Skipped),
        Err(e) => {
            warn!("{} unavailable, keeping rule-based label: {}", enricher.name(), e);
            (report, CollaboratorStatus::Unavailable(e.to_string()))
        }
    }
}

// OpenAI-compatible chat completions

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub struct OpenAiEnricher {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiEnricher {
    /// `None` when no API key is configured or the HTTP client cannot be built.
    pub fn from_config(cfg: &EnrichmentConfig) -> Option<Self> {
        if !cfg.is_configured() {
            return None;
        }
        if cfg.timeout_secs == 0 {
            warn!("Enrichment disabled: ENRICHMENT_TIMEOUT_SECS must be positive");
            return None;
        }
        let client = match Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!("Enrichment disabled: failed to build HTTP client: {}", e);
                return None;
            }
        };
        Some(Self {
            client,
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
        })
    }

    fn build_prompt(summary: &Summary, trades: &[Trade]) -> String {
        let m = &summary.metrics;
        let h = &summary.historical;
        let buys = trades.iter().filter(|t| t.side == Side::Buy).count();
        let sells = trades.len() - buys;
        let symbols: BTreeSet<&str> = trades.iter().map(|t| t.symbol.as_str()).collect();
        let wins = trades.iter().filter(|t| t.is_win()).count();
        let losses = trades.iter().filter(|t| t.is_loss()).count();

        format!(
            "Analyze this trading strategy.\n\n\
             CURRENT METRICS:\n\
             - Total trades: {}\n\
             - Net profit: ${:.2}\n\
             - Win rate: {:.2}%\n\
             - Profit factor: {:.2}\n\
             - Max drawdown: ${:.2}\n\
             - Sharpe ratio: {:.2}\n\
             - Detected timeframe: {}\n\
             - Rule-based label: {}\n\n\
             HISTORY:\n\
             - Closed deals: {}\n\
             - Win rate: {:.2}%\n\
             - Profit: ${:.2}\n\
             - Best session: {}\n\
             - Best symbol: {}\n\n\
             PATTERNS:\n\
             - BUY/SELL: {}/{}\n\
             - Symbols: {}\n\
             - Winners/losers: {}/{}\n\n\
             Reply with JSON: {{\"strategy_name\": string, \"strategy_description\": string \
             (2-3 sentences), \"indicators_detected\": [string], \"confidence_score\": 0-100}}",
            m.total_trades,
            m.net_profit,
            m.win_rate,
            m.profit_factor,
            m.max_drawdown,
            m.sharpe_ratio,
            summary.classification.timeframe,
            summary.classification.strategy,
            h.historical_total_trades,
            h.historical_win_rate,
            h.historical_profit,
            h.best_session.map(|s| s.as_str()).unwrap_or("N/A"),
            h.best_symbol,
            buys,
            sells,
            symbols.into_iter().collect::<Vec<_>>().join(", "),
            wins,
            losses,
        )
    }
}

#[async_trait]
impl Enricher for OpenAiEnricher {
    async fn enrich(
        &self,
        summary: &Summary,
        trades: &[Trade],
    ) -> Result<Option<EnrichmentOverride>, EnrichmentError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::build_prompt(summary, trades) }
            ],
            "max_tokens": self.max_tokens,
            "temperature": 0.7,
            "response_format": { "type": "json_object" }
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EnrichmentError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = resp.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(EnrichmentError::EmptyResponse)?;

        parse_override(&content)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Decodes the model's JSON object. A blank strategy name means no opinion.
fn parse_override(content: &str) -> Result<Option<EnrichmentOverride>, EnrichmentError> {
    let ov: EnrichmentOverride = serde_json::from_str(content)?;
    if ov.strategy_name.trim().is_empty() {
        return Ok(None);
    }
    let confidence = ov.confidence.filter(|c| c.is_finite()).map(|c| c.clamp(0.0, 100.0));
    Ok(Some(EnrichmentOverride { confidence, ..ov }))
}
