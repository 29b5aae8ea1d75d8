//! Serializable series envelope with indicator overlays.

use crate::overlay::{
    self, DEFAULT_BBANDS_K, DEFAULT_BBANDS_PERIOD, DEFAULT_MA_PERIODS, DEFAULT_RSI_PERIOD,
};
use candlewick_types::{Candle, Timeframe};
use serde::{Deserialize, Serialize};

/// A moving average overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverage {
    /// Look-back period in candles.
    pub period: usize,
    /// One value per candle, `None` during warm-up.
    pub values: Vec<Option<f64>>,
}

/// Bollinger band overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerOverlay {
    /// Window length in candles.
    pub n: usize,
    /// Band width in standard deviations.
    pub k: f64,
    /// Upper band.
    pub up: Vec<Option<f64>>,
    /// Middle band.
    pub mid: Vec<Option<f64>>,
    /// Lower band.
    pub down: Vec<Option<f64>>,
}

/// Relative strength index overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiOverlay {
    /// Look-back period in candles.
    pub period: usize,
    /// One value per candle, `None` during warm-up.
    pub values: Vec<Option<f64>>,
}

/// Response envelope for a candle series.
///
/// Overlays are computed from the close prices and attached only when the
/// series is long enough to produce at least one value. Empty overlays are
/// omitted from the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleFrame {
    /// Instrument identifier.
    pub symbol: String,
    /// Bucket width of every candle.
    pub timeframe: Timeframe,
    /// Candles ordered oldest first.
    pub candles: Vec<Candle>,
    /// Simple moving averages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub smas: Vec<MovingAverage>,
    /// Exponential moving averages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emas: Vec<MovingAverage>,
    /// Bollinger bands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbands: Option<BollingerOverlay>,
    /// Relative strength index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<RsiOverlay>,
}

impl CandleFrame {
    /// Creates a frame with no overlays.
    #[must_use]
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, candles: Vec<Candle>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            candles,
            smas: Vec::new(),
            emas: Vec::new(),
            bbands: None,
            rsi: None,
        }
    }

    /// Returns the close prices, oldest first.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// Attaches a simple moving average if there are more candles than `period`.
    pub fn add_sma(&mut self, period: usize) -> bool {
        if period == 0 || self.candles.len() <= period {
            return false;
        }
        self.smas.push(MovingAverage {
            period,
            values: overlay::sma(&self.closes(), period),
        });
        true
    }

    /// Attaches an exponential moving average if there are more candles than `period`.
    pub fn add_ema(&mut self, period: usize) -> bool {
        if period == 0 || self.candles.len() <= period {
            return false;
        }
        self.emas.push(MovingAverage {
            period,
            values: overlay::ema(&self.closes(), period),
        });
        true
    }

    /// Attaches Bollinger bands if there are at least `n` candles.
    ///
    /// Replaces any bands attached earlier.
    pub fn add_bbands(&mut self, n: usize, k: f64) -> bool {
        if n == 0 || self.candles.len() < n {
            return false;
        }
        let bands = overlay::bollinger(&self.closes(), n, k);
        self.bbands = Some(BollingerOverlay {
            n,
            k,
            up: bands.upper,
            mid: bands.middle,
            down: bands.lower,
        });
        true
    }

    /// Attaches an RSI if there are more candles than `period`.
    ///
    /// Replaces any RSI attached earlier.
    pub fn add_rsi(&mut self, period: usize) -> bool {
        if period == 0 || self.candles.len() <= period {
            return false;
        }
        self.rsi = Some(RsiOverlay {
            period,
            values: overlay::rsi(&self.closes(), period),
        });
        true
    }

    /// Attaches every overlay with its default parameters, skipping those
    /// the series is too short for.
    #[must_use]
    pub fn with_default_overlays(mut self) -> Self {
        for period in DEFAULT_MA_PERIODS {
            self.add_sma(period);
            self.add_ema(period);
        }
        self.add_bbands(DEFAULT_BBANDS_PERIOD, DEFAULT_BBANDS_K);
        self.add_rsi(DEFAULT_RSI_PERIOD);
        self
    }
}
