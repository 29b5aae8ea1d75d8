//! Durable keyed candle storage for candlewick.
//!
//! This crate provides the storage seam used by the aggregator and the
//! read path:
//!
//! - [`CandleStore`] - Async storage trait (get, insert, update, recent)
//! - [`MemoryStore`] - Ordered in-process store
//! - [`SqliteStore`] - SQLite store with one table per timeframe

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/candlewick-rs/candlewick/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod store;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConfig, SqliteStore};
pub use store::CandleStore;
