//! OHLCV candle data structure and its storage key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Timeframe;

/// Unique storage key of a candle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandleKey {
    /// Instrument symbol.
    pub symbol: String,
    /// Bucketing timeframe.
    pub timeframe: Timeframe,
    /// Start of the bucket.
    pub bucket_start: DateTime<Utc>,
}

impl CandleKey {
    /// Creates a new candle key.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bucket_start: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bucket_start,
        }
    }
}

impl std::fmt::Display for CandleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}@{}",
            self.symbol,
            self.timeframe,
            self.bucket_start.to_rfc3339()
        )
    }
}

/// OHLCV bar (candlestick) for one bucket of one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Instrument symbol.
    pub symbol: String,
    /// Bucketing timeframe.
    pub timeframe: Timeframe,
    /// Bucket open time (start of the period).
    pub bucket_start: DateTime<Utc>,
    /// Opening price (first tick's mid price).
    pub open: f64,
    /// Highest mid price during the period.
    pub high: f64,
    /// Lowest mid price during the period.
    pub low: f64,
    /// Closing price (most recent tick's mid price).
    pub close: f64,
    /// Sum of the volume deltas of every contributing tick.
    pub volume: f64,
}

impl Candle {
    /// Creates a new candle from explicit values.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bucket_start: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bucket_start,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Opens a new bucket from its first price.
    #[must_use]
    pub fn open_at(key: CandleKey, price: f64, volume: f64) -> Self {
        Self {
            symbol: key.symbol,
            timeframe: key.timeframe,
            bucket_start: key.bucket_start,
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }

    /// Folds a subsequent price into the bucket.
    ///
    /// A price equal to the current high takes the high branch, and the low
    /// is only considered when the high branch did not match. The close is
    /// always replaced.
    pub fn absorb(&mut self, price: f64, volume: f64) {
        if self.high <= price {
            self.high = price;
        } else if self.low >= price {
            self.low = price;
        }
        self.volume += volume;
        self.close = price;
    }

    /// Returns the storage key of this candle.
    #[must_use]
    pub fn key(&self) -> CandleKey {
        CandleKey::new(self.symbol.clone(), self.timeframe, self.bucket_start)
    }

    /// Returns true if the price and volume invariants hold.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.low <= self.high
            && (self.low..=self.high).contains(&self.open)
            && (self.low..=self.high).contains(&self.close)
            && self.volume >= 0.0
    }
}
