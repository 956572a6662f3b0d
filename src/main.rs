mod runner;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use trade_insight::config::Config;

use crate::runner::InsightRunner;

#[tokio::main]
async fn main() -> Result<()> {
    let mut cfg = Config::from_env();
    if let Some(path) = std::env::args().nth(1) {
        cfg.trades_file = path;
    }

    // Logs go to stderr; stdout carries the report.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.log_level.to_lowercase()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let runner = InsightRunner::new(cfg);
    let output = runner.run().await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
