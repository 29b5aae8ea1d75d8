//! Ascending candle series.

use crate::CandleFrame;
use candlewick_types::{Candle, Timeframe};
use chrono::{DateTime, Utc};

/// Candles for one symbol and timeframe, ordered oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    symbol: String,
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Wraps candles already ordered by ascending bucket start.
    #[must_use]
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, candles: Vec<Candle>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            candles,
        }
    }

    /// Instrument identifier.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Bucket width.
    #[must_use]
    pub const fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// The candles, oldest first.
    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Number of candles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Returns true if the series holds no candles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent candle.
    #[must_use]
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Bucket start times.
    #[must_use]
    pub fn times(&self) -> Vec<DateTime<Utc>> {
        self.candles.iter().map(|c| c.bucket_start).collect()
    }

    /// Open prices.
    #[must_use]
    pub fn opens(&self) -> Vec<f64> {
        self.project(|c| c.open)
    }

    /// High prices.
    #[must_use]
    pub fn highs(&self) -> Vec<f64> {
        self.project(|c| c.high)
    }

    /// Low prices.
    #[must_use]
    pub fn lows(&self) -> Vec<f64> {
        self.project(|c| c.low)
    }

    /// Close prices.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.project(|c| c.close)
    }

    /// Volumes.
    #[must_use]
    pub fn volumes(&self) -> Vec<f64> {
        self.project(|c| c.volume)
    }

    /// Converts the series into a response envelope without overlays.
    #[must_use]
    pub fn into_frame(self) -> CandleFrame {
        CandleFrame::new(self.symbol, self.timeframe, self.candles)
    }

    fn project(&self, field: impl Fn(&Candle) -> f64) -> Vec<f64> {
        self.candles.iter().map(field).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlewick_types::CandleKey;
    use chrono::{TimeDelta, TimeZone};

    #[test]
    fn test_projections_are_parallel() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let candles: Vec<_> = (0..3)
            .map(|i| {
                let key = CandleKey::new("BTC_JPY", Timeframe::Hour1, start + TimeDelta::hours(i));
                let mut candle = Candle::open_at(key, 10.0, 1.0);
                candle.absorb(12.0 + i as f64, 0.5);
                candle.absorb(9.0, 0.5);
                candle
            })
            .collect();
        let series = CandleSeries::new("BTC_JPY", Timeframe::Hour1, candles);

        assert_eq!(series.len(), 3);
        assert_eq!(series.times()[2], start + TimeDelta::hours(2));
        assert_eq!(series.opens(), vec![10.0; 3]);
        assert_eq!(series.highs(), vec![12.0, 13.0, 14.0]);
        assert_eq!(series.lows(), vec![9.0; 3]);
        assert_eq!(series.closes(), vec![9.0; 3]);
        assert_eq!(series.volumes(), vec![2.0; 3]);

        let frame = series.into_frame();
        assert_eq!(frame.symbol, "BTC_JPY");
        assert_eq!(frame.candles.len(), 3);
    }

    #[test]
    fn test_empty_series() {
        let series = CandleSeries::new("UNKNOWN", Timeframe::Minute1, Vec::new());

        assert!(series.is_empty());
        assert!(series.last().is_none());
        assert!(series.closes().is_empty());
    }
}
