//! Streaming multi-timeframe candle aggregation for candlewick.
//!
//! This crate provides the write path of the engine:
//!
//! - [`CandleAggregator`] - Folds a tick into the stored candle for one timeframe
//! - [`DurationFanout`] - Dispatches ticks to one lane per configured timeframe
//! - [`ingest`] - Drives a tick stream through the fanout until it closes

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/candlewick-rs/candlewick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod fanout;
mod ingest;

pub use aggregator::CandleAggregator;
pub use fanout::{DurationFanout, FanoutSummary, LaneStats};
pub use ingest::{IngestReport, ingest};
