use anyhow::{bail, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::reporting::alerts::Alert;
use crate::reporting::report::Report;

const ALERTS_FILE: &str = "alerts.json";
const MAX_NAME_ATTEMPTS: usize = 1000;

/// Writes finished reports and an append-only alert log under one directory.
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create report dir {}", self.dir.display()))
    }

    /// Writes `report_<generated_at>.json` and returns its path. Never
    /// overwrites: a clash gets a `_<n>` suffix.
    pub fn save_report(&self, report: &Report) -> Result<PathBuf> {
        self.ensure_dir()?;
        let stamp = report.summary().generated_at.format("%Y%m%dT%H%M%S%3fZ")
            .to_string();
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;

        for n in 0..MAX_NAME_ATTEMPTS {
            let name = if n == 0 {
                format!("report_{}.json", stamp)
            } else {
                format!("report_{}_{}.json", stamp, n)
            };
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(json.as_bytes())
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    debug!("Saved report to {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to create {}", path.display()))
                }
            }
        }
        bail!(
            "No free report name for {} in {}",
            stamp,
            self.dir.display()
        )
    }

    /// Appends to the alert log, creating it on first use.
    pub fn append_alerts(&self, alerts: &[Alert]) -> Result<usize> {
        if alerts.is_empty() {
            return Ok(0);
        }
        self.ensure_dir()?;
        let mut log = self.load_alerts()?;
        log.extend_from_slice(alerts);

        let path = self.dir.join(ALERTS_FILE);
        let json = serde_json::to_string_pretty(&log).context("Failed to serialize alerts")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Alert log now holds {} entries", log.len());
        Ok(log.len())
    }

    pub fn load_alerts(&self) -> Result<Vec<Alert>> {
        let path = self.dir.join(ALERTS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Corrupt alert log {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisOptions;
    use crate::models::{ReportInput, TradeSeries};
    use crate::reporting::report::ReportComposer;
    use crate::test_helpers::{make_trades, utc};

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("trade_insight_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn losing_report() -> (Report, Vec<Alert>) {
        ReportComposer::new(AnalysisOptions::default())
            .with_clock(utc("2024-02-01T09:30:00Z"))
            .compose(&ReportInput::new(
                make_trades(&[-10.0, -20.0, -30.0]),
                TradeSeries::default(),
            ))
            .unwrap()
    }

    #[test]
    fn saves_report_named_by_timestamp() {
        let dir = temp_dir("save");
        let store = ReportStore::new(&dir);
        let (report, _) = losing_report();

        let path = store.save_report(&report).unwrap();
        assert_eq!(path.file_name().unwrap(), "report_20240201T093000000Z.json");

        let back: Report = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.summary().metrics, report.summary().metrics);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn same_timestamp_does_not_overwrite() {
        let dir = temp_dir("clash");
        let store = ReportStore::new(&dir);
        let (report, _) = losing_report();

        let first = store.save_report(&report).unwrap();
        let second = store.save_report(&report).unwrap();
        assert_ne!(first, second);
        assert_eq!(second.file_name().unwrap(), "report_20240201T093000000Z_1.json");
        assert!(first.exists() && second.exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn alert_log_appends() {
        let dir = temp_dir("alerts");
        let store = ReportStore::new(&dir);
        let (_, alerts) = losing_report();
        assert_eq!(alerts.len(), 2);

        assert_eq!(store.append_alerts(&alerts).unwrap(), 2);
        assert_eq!(store.append_alerts(&alerts).unwrap(), 4);
        assert_eq!(store.append_alerts(&[]).unwrap(), 0);
        assert_eq!(store.load_alerts().unwrap().len(), 4);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_log_is_empty() {
        let store = ReportStore::new(temp_dir("missing"));
        assert!(store.load_alerts().unwrap().is_empty());
    }
}
