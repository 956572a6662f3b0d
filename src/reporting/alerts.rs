use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use crate::reporting::report::Summary;

// Fixed thresholds. Making them runtime-configurable is a possible extension.
const CONSECUTIVE_LOSS_THRESHOLD: usize = 3;
const HIGH_DRAWDOWN_THRESHOLD: f64 = 1000.0;
const LOW_PROFIT_FACTOR_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    ConsecutiveLosses,
    HighDrawdown,
    LowProfitFactor,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::ConsecutiveLosses => "consecutive_losses",
            AlertType::HighDrawdown => "high_drawdown",
            AlertType::LowProfitFactor => "low_profit_factor",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Stateless threshold checks over a finished summary. Each check is independent.
pub struct AlertEngine;

impl AlertEngine {
    pub fn evaluate(summary: &Summary, at: DateTime<Utc>) -> Vec<Alert> {
        let mut alerts = Vec::new();
        let metrics = &summary.metrics;

        // Nothing to judge on an empty live set.
        if metrics.total_trades == 0 {
            return alerts;
        }

        let losses = summary.consecutive_losses;
        if losses >= CONSECUTIVE_LOSS_THRESHOLD {
            alerts.push(Alert {
                alert_type: AlertType::ConsecutiveLosses,
                severity: Severity::Warning,
                message: format!("Detected {} consecutive losses", losses),
                payload: json!({ "count": losses }),
                timestamp: at,
            });
        }

        if metrics.max_drawdown > HIGH_DRAWDOWN_THRESHOLD {
            alerts.push(Alert {
                alert_type: AlertType::HighDrawdown,
                severity: Severity::Critical,
                message: format!("High drawdown detected: ${:.2}", metrics.max_drawdown),
                payload: json!({ "drawdown": metrics.max_drawdown }),
                timestamp: at,
            });
        }

        if metrics.profit_factor < LOW_PROFIT_FACTOR_THRESHOLD {
            alerts.push(Alert {
                alert_type: AlertType::LowProfitFactor,
                severity: Severity::Warning,
                message: format!("Low profit factor: {:.2}", metrics.profit_factor),
                payload: json!({ "profit_factor": metrics.profit_factor }),
                timestamp: at,
            });
        }

        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisOptions;
    use crate::models::{ReportInput, TradeSeries};
    use crate::reporting::report::ReportComposer;
    use crate::test_helpers::{make_trades, utc};

    fn summary_for(profits: &[f64]) -> Summary {
        let composer = ReportComposer::new(AnalysisOptions::default())
            .with_clock(utc("2024-02-01T00:00:00Z"));
        let input = ReportInput::new(make_trades(profits), TradeSeries::default());
        let (report, _) = composer.compose(&input).unwrap();
        report.summary().clone()
    }

    fn types(alerts: &[Alert]) -> Vec<AlertType> {
        alerts.iter().map(|a| a.alert_type).collect()
    }

    #[test]
    fn three_losses_warns() {
        let s = summary_for(&[-50.0, -60.0, -70.0]);
        let alerts = AlertEngine::evaluate(&s, utc("2024-02-01T00:00:00Z"));
        let streak: Vec<&Alert> = alerts
            .iter()
            .filter(|a| a.alert_type == AlertType::ConsecutiveLosses)
            .collect();
        assert_eq!(streak.len(), 1);
        assert_eq!(streak[0].severity, Severity::Warning);
        assert_eq!(streak[0].payload["count"], 3);
        // No winners, so the profit factor check fires too.
        assert!(types(&alerts).contains(&AlertType::LowProfitFactor));
        assert!(!types(&alerts).contains(&AlertType::HighDrawdown));
    }

    #[test]
    fn two_losses_do_not_warn() {
        let s = summary_for(&[-50.0, -60.0, 200.0]);
        let alerts = AlertEngine::evaluate(&s, utc("2024-02-01T00:00:00Z"));
        assert!(alerts.is_empty());
    }

    #[test]
    fn drawdown_over_threshold_is_critical() {
        let s = summary_for(&[500.0, 2000.0, -1500.0, 300.0]);
        let alerts = AlertEngine::evaluate(&s, utc("2024-02-01T00:00:00Z"));
        assert_eq!(types(&alerts), vec![AlertType::HighDrawdown]);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[0].payload["drawdown"], 1500.0);
    }

    #[test]
    fn drawdown_at_threshold_is_silent() {
        let s = summary_for(&[2000.0, -1000.0, 500.0]);
        let alerts = AlertEngine::evaluate(&s, utc("2024-02-01T00:00:00Z"));
        assert!(!types(&alerts).contains(&AlertType::HighDrawdown));
    }

    #[test]
    fn all_three_can_fire() {
        let s = summary_for(&[100.0, -400.0, -400.0, -400.0]);
        let alerts = AlertEngine::evaluate(&s, utc("2024-02-01T00:00:00Z"));
        assert_eq!(
            types(&alerts),
            vec![
                AlertType::ConsecutiveLosses,
                AlertType::HighDrawdown,
                AlertType::LowProfitFactor
            ]
        );
    }

    #[test]
    fn empty_summary_has_no_alerts() {
        let s = summary_for(&[]);
        assert!(AlertEngine::evaluate(&s, utc("2024-02-01T00:00:00Z")).is_empty());
    }

    #[test]
    fn alert_wire_format() {
        let s = summary_for(&[-1.0, -1.0, -1.0]);
        let alerts = AlertEngine::evaluate(&s, utc("2024-02-01T00:00:00Z"));
        let json = serde_json::to_value(&alerts[0]).unwrap();
        assert_eq!(json["type"], "consecutive_losses");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["timestamp"], "2024-02-01T00:00:00Z");
    }
}
