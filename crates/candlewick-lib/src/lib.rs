//! Streaming OHLCV candle aggregation engine.
//!
//! This is a facade crate that re-exports functionality from the candlewick
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use candlewick_lib::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let timeframes = [Timeframe::Second1, Timeframe::Minute1, Timeframe::Hour1];
//!     let aggregator = Arc::new(CandleAggregator::new(Arc::clone(&store), &timeframes));
//!
//!     let fanout = DurationFanout::start(aggregator);
//!     fanout.on_tick(Tick::new("BTC_JPY", chrono::Utc::now(), 100.0, 101.0, 0.5));
//!     fanout.shutdown().await;
//!
//!     let reader = CandleSeriesReader::new(store);
//!     let frame = reader
//!         .query(&SeriesQuery::new("BTC_JPY"))
//!         .await?
//!         .into_frame()
//!         .with_default_overlays();
//!     println!("{} candles", frame.candles.len());
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/candlewick-rs/candlewick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use candlewick_types::*;

// Re-export storage
pub use candlewick_store::{CandleStore, MemoryStore};

#[cfg(feature = "sqlite")]
pub use candlewick_store::{SqliteConfig, SqliteStore};

// Re-export the write path
#[cfg(feature = "aggregate")]
pub use candlewick_aggregate::{
    CandleAggregator, DurationFanout, FanoutSummary, IngestReport, LaneStats, ingest,
};

// Re-export the read path
#[cfg(feature = "series")]
pub use candlewick_series::{
    BollingerOverlay, CandleFrame, CandleSeries, CandleSeriesReader, DEFAULT_LIMIT,
    MovingAverage, RsiOverlay, SeriesQuery, overlay,
};

/// Prelude module for convenient imports.
///
/// ```
/// use candlewick_lib::prelude::*;
/// ```
pub mod prelude {
    pub use candlewick_types::{Candle, CandleError, CandleKey, Result, Tick, Timeframe};

    pub use candlewick_store::{CandleStore, MemoryStore};

    #[cfg(feature = "sqlite")]
    pub use candlewick_store::{SqliteConfig, SqliteStore};

    #[cfg(feature = "aggregate")]
    pub use candlewick_aggregate::{CandleAggregator, DurationFanout, ingest};

    #[cfg(feature = "series")]
    pub use candlewick_series::{CandleFrame, CandleSeries, CandleSeriesReader, SeriesQuery};
}
