use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AnalysisOptions;
use crate::core::metrics::{win_rate, PerformanceMetrics};
use crate::core::risk::RiskReport;
use crate::core::schedule::ScheduleReport;
use crate::core::sessions::{SessionReport, TradingSession};
use crate::core::streaks::{max_consecutive_losses, StreakStats};
use crate::error::AnalyticsError;
use crate::models::{ReportInput, TradeSeries};
use crate::reporting::alerts::{Alert, AlertEngine};
use crate::reporting::enrichment::EnrichmentOverride;
use crate::strategies::classifier::{Classification, ClassificationSource, StrategyClassifier};
use crate::strategies::templates::TemplateKey;
use crate::trading::symbol_analyzer::SymbolReport;

/// Closed-deal history figures carried in the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSummary {
    pub historical_total_trades: usize,
    pub historical_win_rate: f64,
    pub historical_profit: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub longest_win_streak: usize,
    pub longest_loss_streak: usize,
    /// Positive while the latest deals are winning, negative while losing.
    pub current_streak: i64,
    pub best_session: Option<TradingSession>,
    pub worst_session: Option<TradingSession>,
    pub best_symbol: String,
    pub worst_symbol: String,
}

impl HistoricalSummary {
    fn build(
        history: &TradeSeries,
        streaks: &StreakStats,
        sessions: &SessionReport,
        symbols: &SymbolReport,
    ) -> Self {
        let profits = history.profits();
        let (best_trade, worst_trade) = if profits.is_empty() {
            (0.0, 0.0)
        } else {
            (
                profits.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                profits.iter().copied().fold(f64::INFINITY, f64::min),
            )
        };

        Self {
            historical_total_trades: profits.len(),
            historical_win_rate: win_rate(&profits),
            historical_profit: profits.iter().sum(),
            best_trade,
            worst_trade,
            longest_win_streak: streaks.longest_win_streak,
            longest_loss_streak: streaks.longest_loss_streak,
            current_streak: streaks.current_streak,
            best_session: sessions.best_session,
            worst_session: sessions.worst_session,
            best_symbol: symbols.best_symbol.clone(),
            worst_symbol: symbols.worst_symbol.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(flatten)]
    pub metrics: PerformanceMetrics,
    /// Longest run of losing open positions.
    pub consecutive_losses: usize,
    #[serde(flatten)]
    pub classification: Classification,
    pub template_key: Option<TemplateKey>,
    pub account_balance: Option<f64>,
    pub account_equity: Option<f64>,
    #[serde(flatten)]
    pub historical: HistoricalSummary,
    pub alerts: Vec<Alert>,
    pub generated_at: DateTime<Utc>,
}

/// One analysis run. Built once by [`ReportComposer`] and never mutated;
/// enrichment produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    summary: Summary,
    session_analysis: SessionReport,
    schedule_analysis: ScheduleReport,
    risk_analysis: RiskReport,
    symbol_analysis: SymbolReport,
}

impl Report {
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn sessions(&self) -> &SessionReport {
        &self.session_analysis
    }

    pub fn schedule(&self) -> &ScheduleReport {
        &self.schedule_analysis
    }

    pub fn risk(&self) -> &RiskReport {
        &self.risk_analysis
    }

    pub fn symbols(&self) -> &SymbolReport {
        &self.symbol_analysis
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.summary.alerts
    }

    /// Replaces only the descriptive classification fields. Blank override
    /// fields keep the rule-based value; numbers are never touched.
    pub fn with_enrichment(self, ov: EnrichmentOverride) -> Report {
        let Report {
            mut summary,
            session_analysis,
            schedule_analysis,
            risk_analysis,
            symbol_analysis,
        } = self;

        let c = &mut summary.classification;
        if !ov.strategy_name.trim().is_empty() {
            c.strategy = ov.strategy_name;
        }
        if !ov.strategy_description.trim().is_empty() {
            c.strategy_description = ov.strategy_description;
        }
        if !ov.indicators.is_empty() {
            c.indicators = ov.indicators;
        }
        c.confidence = ov.confidence;
        c.source = ClassificationSource::Enriched;
        summary.template_key = TemplateKey::from_label(&c.strategy);

        Report {
            summary,
            session_analysis,
            schedule_analysis,
            risk_analysis,
            symbol_analysis,
        }
    }
}

/// Runs every analyzer in a fixed order and merges the results.
///
/// Pure: no I/O, no shared state. Set a clock for reproducible timestamps.
pub struct ReportComposer {
    options: AnalysisOptions,
    clock: Option<DateTime<Utc>>,
}

impl ReportComposer {
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            options,
            clock: None,
        }
    }

    pub fn with_clock(mut self, at: DateTime<Utc>) -> Self {
        self.clock = Some(at);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }

    pub fn compose(&self, input: &ReportInput) -> Result<(Report, Vec<Alert>), AnalyticsError> {
        input.positions.validate()?;
        input.deals.validate()?;
        let generated_at = self.now();

        // Live set: open positions only. Metrics, classification, live loss streak.
        let positions = input.positions.open_positions().chronological();
        let metrics = PerformanceMetrics::calculate(&positions, &self.options);
        let classification = StrategyClassifier::classify(&positions);
        let consecutive_losses = max_consecutive_losses(&positions.profits());
        debug!(
            "Live set: {} positions, strategy={}, timeframe={}",
            metrics.total_trades, classification.strategy, classification.timeframe
        );

        // History set: closing deals only.
        let history = input.deals.closed_deals().chronological();
        let streaks = StreakStats::from_deals(&history);
        let session_analysis = SessionReport::from_deals(&history);
        let schedule_analysis = ScheduleReport::from_deals(&history);
        let risk_analysis = RiskReport::from_deals(&history, &self.options);
        let symbol_analysis = SymbolReport::from_deals(&history);
        debug!(
            "History set: {} closed deals, {} symbols, {} sessions",
            history.len(),
            symbol_analysis.symbols.len(),
            session_analysis.sessions.len()
        );

        let historical =
            HistoricalSummary::build(&history, &streaks, &session_analysis, &symbol_analysis);

        let mut summary = Summary {
            metrics,
            consecutive_losses,
            template_key: TemplateKey::from_label(&classification.strategy),
            classification,
            account_balance: input.account.map(|a| a.balance),
            account_equity: input.account.map(|a| a.equity),
            historical,
            alerts: Vec::new(),
            generated_at,
        };

        let alerts = AlertEngine::evaluate(&summary, generated_at);
        summary.alerts = alerts.clone();

        info!(
            "Report: {} trades | WR {:.1}% | PF {:.2} | DD ${:.2} | {} | {} alert(s)",
            summary.metrics.total_trades,
            summary.metrics.win_rate,
            summary.metrics.profit_factor,
            summary.metrics.max_drawdown,
            summary.classification.strategy,
            alerts.len()
        );

        let report = Report {
            summary,
            session_analysis,
            schedule_analysis,
            risk_analysis,
            symbol_analysis,
        };
        Ok((report, alerts))
    }
}
