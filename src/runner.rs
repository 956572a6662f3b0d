use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use tracing::{error, info, warn};

use trade_insight::config::Config;
use trade_insight::models::TradeFeed;
use trade_insight::reporting::{
    enrich_report, Alert, CollaboratorStatus, Enricher, OpenAiEnricher, Report, ReportComposer,
    ReportStore,
};

#[derive(Debug, Serialize)]
pub struct Collaborators {
    pub enrichment: CollaboratorStatus,
    pub store: CollaboratorStatus,
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub report: Report,
    pub alerts: Vec<Alert>,
    pub collaborators: Collaborators,
}

pub struct InsightRunner {
    config: Config,
    enricher: Option<Box<dyn Enricher>>,
    store: ReportStore,
}

impl InsightRunner {
    pub fn new(config: Config) -> Self {
        let enricher = OpenAiEnricher::from_config(&config.enrichment)
            .map(|e| Box::new(e) as Box<dyn Enricher>);
        let store = ReportStore::new(&config.report_dir);

        info!("{}", "=".repeat(60));
        info!("Trade insight starting up");
        info!("Input: {}", config.trades_file);
        info!("Report dir: {}", store.dir().display());
        info!(
            "Enrichment: {}",
            if enricher.is_some() {
                config.enrichment.model.as_str()
            } else {
                "disabled"
            }
        );
        info!(
            "Profit factor without losses: {:?}, avg loss fallback: {}",
            config.options.profit_factor_no_loss, config.options.avg_loss_fallback
        );
        info!("{}", "=".repeat(60));

        Self {
            config,
            enricher,
            store,
        }
    }

    pub async fn run(&self) -> Result<RunOutput> {
        let path = &self.config.trades_file;
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read trades file {}", path))?;
        let feed: TradeFeed =
            serde_json::from_str(&content).with_context(|| format!("Malformed trades file {}", path))?;
        info!(
            "Loaded {} positions and {} deals",
            feed.positions.len(),
            feed.deals.len()
        );

        let input = feed.normalize().context("Rejected trade feed")?;

        let composer = ReportComposer::new(self.config.options);
        let (report, alerts) = composer.compose(&input)?;
        for alert in &alerts {
            warn!("[{}] {}", alert.severity, alert.message);
        }

        let live = input.positions.open_positions();
        let (report, enrichment) =
            enrich_report(report, live.as_slice(), self.enricher.as_deref()).await;

        let store = self.persist(&report, &alerts);

        Ok(RunOutput {
            report,
            alerts,
            collaborators: Collaborators { enrichment, store },
        })
    }

    /// Best effort: a storage failure never loses the computed report.
    fn persist(&self, report: &Report, alerts: &[Alert]) -> CollaboratorStatus {
        let saved = self
            .store
            .save_report(report)
            .and_then(|path| self.store.append_alerts(alerts).map(|_| path));
        match saved {
            Ok(path) => {
                info!("Report saved to {}", path.display());
                CollaboratorStatus::Applied
            }
            Err(e) => {
                error!("Failed to persist report: {:#}", e);
                CollaboratorStatus::Unavailable(format!("{:#}", e))
            }
        }
    }
}
