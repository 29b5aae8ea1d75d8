//! CLI command implementations.

pub(crate) mod ingest;
pub(crate) mod query;
pub(crate) mod timeframes;

use crate::config::Config;
use anyhow::{Context, Result};
use candlewick_lib::{SqliteConfig, SqliteStore};
use std::sync::Arc;
use tracing::info;

/// Opens the configured SQLite store, provisioning one table per timeframe.
pub(crate) fn open_store(config: &Config) -> Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(&SqliteConfig::new(&config.database), &config.timeframes)
        .with_context(|| format!("Failed to open database: {}", config.database.display()))?;
    info!(
        database = %config.database.display(),
        timeframes = config.timeframes.len(),
        "Opened candle store"
    );
    Ok(Arc::new(store))
}
