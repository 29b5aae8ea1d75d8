//! Core types for the candlewick candle aggregation engine.
//!
//! This crate provides the fundamental data structures used throughout candlewick:
//!
//! - [`Tick`] - A normalized quote event with bid, ask and volume delta
//! - [`Timeframe`] - Bucketing granularity for candles
//! - [`Candle`] - An OHLCV bar for one bucket of one timeframe
//! - [`CandleKey`] - The unique storage key of a candle
//! - [`CandleError`] - Error taxonomy shared by the store and the aggregator

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/candlewick-rs/candlewick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod candle;
mod error;
mod tick;
mod timeframe;

pub use candle::{Candle, CandleKey};
pub use error::{CandleError, Result};
pub use tick::Tick;
pub use timeframe::{Timeframe, TimeframeParseError};
