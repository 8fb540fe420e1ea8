//! tagstats collector
//!
//! Reads `tag<TAB>datum` lines from stdin, records them through the event bus,
//! and prints a report every `report.interval_ms`. EOF or Ctrl-C prints a final
//! report and stops collection.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use tagstats_collector::{config, ingest, obs, EventBus, StatsRegistry, StatsSettings};
use tagstats_core::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "tagstats.yaml".to_string());
    let cfg = config::load_from_file(&path)?;

    let settings = Arc::new(StatsSettings::from_config(&cfg.stats));
    let bus = Arc::new(EventBus::new());
    let registry = StatsRegistry::new(settings, Arc::clone(&bus));
    registry.init();

    tracing::info!(config = %path, "tagstats-collector starting");

    let format = cfg.report.format;
    let mut ticker = tokio::time::interval(Duration::from_millis(cfg.report.interval_ms));
    ticker.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if let Some((tag, datum)) = ingest::parse_line(&line) {
                            bus.emit(tag, datum);
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "stdin read failed");
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                print_report(&registry, format)?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    print_report(&registry, format)?;
    registry.stop();
    Ok(())
}

fn print_report(registry: &StatsRegistry, format: config::ReportFormat) -> Result<()> {
    let body = obs::render(format, &registry.records(), registry.restart_time_ms())?;
    println!("{body}");
    Ok(())
}
