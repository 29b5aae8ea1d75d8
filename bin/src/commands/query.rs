//! Query command implementation.

use crate::config::Config;
use anyhow::{Context, Result};
use candlewick_lib::prelude::*;

/// Print the most recent candles for a symbol as a JSON frame.
pub(crate) async fn query(
    config: &Config,
    symbol: &str,
    duration: Option<&str>,
    limit: Option<&str>,
    overlays: bool,
    pretty: bool,
) -> Result<()> {
    let query = SeriesQuery::from_params(symbol, duration, limit)?;
    let store = super::open_store(config)?;
    let reader = CandleSeriesReader::new(store).with_cap(config.query_limit);

    let series = reader
        .query(&query)
        .await
        .with_context(|| format!("Failed to read candles for {symbol}"))?;

    let mut frame = series.into_frame();
    if overlays {
        frame = frame.with_default_overlays();
    }

    let json = if pretty {
        serde_json::to_string_pretty(&frame)?
    } else {
        serde_json::to_string(&frame)?
    };
    println!("{json}");
    Ok(())
}
