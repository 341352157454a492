use std::fs::File;
use std::io::{self, BufReader};

use anyhow::Context;
use tracker_cli::{OUTPUT_KEY, OutputFormat, Processor, env_filter, log_filter_from_env_with};
use tracker_core::config::Config;

fn main() -> Result<(), anyhow::Error> {
    // Configure logging from env var `TRACKER_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = log_filter_from_env_with(|k| std::env::var(k).ok());
    let filter = env_filter(&log_env);
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .init();
    tracing::debug!(%log_env, "tracker: log filter");

    let config = Config::from_env().context("loading biometrics")?;
    let format = OutputFormat::from_env_value(std::env::var(OUTPUT_KEY).ok().as_deref())?;
    let processor = Processor::new(config.biometrics, format);

    let stdout = io::stdout().lock();
    let stats = match std::env::args().nth(1).filter(|p| p != "-") {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening {path}"))?;
            processor.process_reader(BufReader::new(file), stdout)?
        }
        None => processor.process_reader(io::stdin().lock(), stdout)?,
    };

    tracing::info!(
        reports = stats.reports,
        rejected = stats.rejected,
        skipped = stats.skipped,
        "tracker: input processed"
    );
    Ok(())
}
