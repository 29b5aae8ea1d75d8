//! Candle series queries and indicator overlays for candlewick.
//!
//! This crate provides the read path of the engine:
//!
//! - [`CandleSeriesReader`] - Range queries over a [`candlewick_store::CandleStore`]
//! - [`SeriesQuery`] - Query parameters with their defaults
//! - [`CandleSeries`] - Ascending candles with column projections
//! - [`CandleFrame`] - Serializable envelope with indicator overlays
//! - [`overlay`] - Indicator math over close prices

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/candlewick-rs/candlewick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod frame;
pub mod overlay;
mod reader;
mod series;

pub use frame::{BollingerOverlay, CandleFrame, MovingAverage, RsiOverlay};
pub use reader::{CandleSeriesReader, DEFAULT_LIMIT, SeriesQuery};
pub use series::CandleSeries;
