//! Ingest command implementation.
//!
//! Replays a newline-delimited JSON tick stream through the aggregation
//! lanes until the input ends or Ctrl-C is pressed.

use crate::config::Config;
use crate::source;
use anyhow::Result;
use candlewick_lib::prelude::*;
use candlewick_lib::IngestReport;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Aggregate ticks from `input` (stdin if `None`) into the configured store.
pub(crate) async fn ingest(config: &Config, input: Option<&Path>, quiet: bool) -> Result<()> {
    let store = super::open_store(config)?;
    let aggregator = Arc::new(CandleAggregator::new(store, &config.timeframes));
    let reader = source::open(input).await?;

    info!(timeframes = ?config.timeframes, "Ingesting ticks");
    let report = candlewick_lib::ingest(
        source::ndjson_ticks(reader),
        DurationFanout::start(aggregator),
        shutdown_signal(),
    )
    .await;

    if !quiet {
        print_report(&report);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

fn print_report(report: &IngestReport) {
    println!("{:<10} {:>12} {:>12} {:>12}", "TIMEFRAME", "APPLIED", "CREATED", "FAILED");
    println!("{}", "-".repeat(50));

    for (timeframe, stats) in &report.summary.lanes {
        println!(
            "{:<10} {:>12} {:>12} {:>12}",
            timeframe.as_str(),
            stats.applied,
            stats.created,
            stats.failed
        );
    }

    let suffix = if report.interrupted { " (interrupted)" } else { "" };
    println!("\nTotal: {} ticks received{suffix}", report.received);
}
