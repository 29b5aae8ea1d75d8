//! Tick data representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CandleError, Result};

/// A single normalized quote event.
///
/// Field aliases accept exchange ticker records (`product_code`, `best_bid`,
/// `best_ask`, `volume`) as well as the normalized shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument symbol (e.g., "BTC_JPY").
    #[serde(alias = "product_code")]
    pub symbol: String,
    /// Timestamp of the quote (UTC).
    pub timestamp: DateTime<Utc>,
    /// Best bid price.
    #[serde(alias = "best_bid")]
    pub bid: f64,
    /// Best ask price.
    #[serde(alias = "best_ask")]
    pub ask: f64,
    /// Volume traded since the previous tick.
    #[serde(alias = "volume")]
    pub volume_delta: f64,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        bid: f64,
        ask: f64,
        volume_delta: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            bid,
            ask,
            volume_delta,
        }
    }

    /// Returns the mid price (average of bid and ask).
    #[must_use]
    pub fn mid_price(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Checks that the tick can be folded into a candle.
    ///
    /// # Errors
    ///
    /// Returns [`CandleError::InvalidInput`] if the symbol is empty, a quote
    /// or the mid price is not finite, or the volume delta is negative or
    /// not finite.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(CandleError::InvalidInput("tick has an empty symbol".into()));
        }
        if !self.bid.is_finite() || !self.ask.is_finite() || !self.mid_price().is_finite() {
            return Err(CandleError::InvalidInput(format!(
                "tick for {} has a non-finite quote (bid={}, ask={})",
                self.symbol, self.bid, self.ask
            )));
        }
        if !self.volume_delta.is_finite() || self.volume_delta < 0.0 {
            return Err(CandleError::InvalidInput(format!(
                "tick for {} has an invalid volume delta {}",
                self.symbol, self.volume_delta
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_tick_mid_price() {
        let tick = Tick::new("BTC_JPY", ts(), 100.0, 102.0, 0.5);
        assert_relative_eq!(tick.mid_price(), 101.0);
    }

    #[test]
    fn test_validate() {
        assert!(Tick::new("BTC_JPY", ts(), 100.0, 102.0, 0.5).validate().is_ok());
        assert!(Tick::new("", ts(), 100.0, 102.0, 0.5).validate().is_err());
        assert!(Tick::new("BTC_JPY", ts(), f64::NAN, 102.0, 0.5).validate().is_err());
        assert!(Tick::new("BTC_JPY", ts(), 100.0, f64::INFINITY, 0.5).validate().is_err());
        assert!(Tick::new("BTC_JPY", ts(), 100.0, 102.0, -1.0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_overflowing_mid() {
        let tick = Tick::new("BTC_JPY", ts(), f64::MAX, f64::MAX, 0.5);

        assert!(tick.mid_price().is_infinite());
        assert!(tick.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_deserialize_ticker_shape() {
        let json = r#"{
            "product_code": "BTC_JPY",
            "timestamp": "2024-01-01T12:00:00.123Z",
            "best_bid": 100.0,
            "best_ask": 102.0,
            "volume": 1.5
        }"#;
        let tick: Tick = serde_json::from_str(json).unwrap();

        assert_eq!(tick.symbol, "BTC_JPY");
        assert_relative_eq!(tick.mid_price(), 101.0);
        assert_relative_eq!(tick.volume_delta, 1.5);
    }

    #[test]
    fn test_deserialize_normalized_shape() {
        let json = r#"{"symbol":"ETH_JPY","timestamp":"2024-01-01T12:00:00Z","bid":1.0,"ask":3.0,"volume_delta":0.0}"#;
        let tick: Tick = serde_json::from_str(json).unwrap();

        assert_eq!(tick.symbol, "ETH_JPY");
        assert_eq!(tick.timestamp, ts());
    }
}
