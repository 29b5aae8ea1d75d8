//! Candle range queries.

use crate::CandleSeries;
use candlewick_store::CandleStore;
use candlewick_types::{CandleError, Result, Timeframe};
use tracing::debug;

/// Largest number of candles a single query returns, and the limit used
/// when a query gives none or an out-of-range one.
pub const DEFAULT_LIMIT: usize = 1000;

/// Parameters of a candle range query.
///
/// Missing values fall back to the defaults when the query runs: the
/// timeframe to [`Timeframe::Minute1`] and the limit to the reader's cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesQuery {
    /// Instrument identifier.
    pub symbol: String,
    /// Bucket width, defaulting to one minute.
    pub timeframe: Option<Timeframe>,
    /// Requested number of candles. Negative or oversized values use the cap.
    pub limit: Option<i64>,
}

impl SeriesQuery {
    /// Creates a query for `symbol` with every other parameter defaulted.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: None,
            limit: None,
        }
    }

    /// Sets the timeframe.
    #[must_use]
    pub const fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    /// Sets the limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builds a query from raw request parameters.
    ///
    /// An empty or missing `duration` means one minute. A missing or
    /// unparseable `limit` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`CandleError::InvalidInput`] if `symbol` is empty or
    /// `duration` is not a known timeframe.
    pub fn from_params(symbol: &str, duration: Option<&str>, limit: Option<&str>) -> Result<Self> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(CandleError::InvalidInput("symbol is required".to_string()));
        }

        let timeframe = match duration.map(str::trim) {
            None | Some("") => None,
            // An unknown duration is an error, not a silent fallback to m1.
            Some(raw) => Some(raw.parse::<Timeframe>()?),
        };
        let limit = limit.and_then(|raw| raw.trim().parse::<i64>().ok());

        Ok(Self {
            symbol: symbol.to_string(),
            timeframe,
            limit,
        })
    }

    /// Returns the timeframe to query.
    #[must_use]
    pub fn resolved_timeframe(&self) -> Timeframe {
        self.timeframe.unwrap_or_default()
    }

    /// Returns the number of candles to fetch given the reader's `cap`.
    #[must_use]
    pub fn resolved_limit(&self, cap: usize) -> usize {
        self.limit
            .and_then(|limit| usize::try_from(limit).ok())
            .filter(|&limit| limit <= cap)
            .unwrap_or(cap)
    }
}

/// Read adapter returning ascending candle series from a store.
///
/// Unknown symbols and timeframes without data produce an empty series.
#[derive(Debug)]
pub struct CandleSeriesReader<S> {
    store: S,
    cap: usize,
}

impl<S: CandleStore> CandleSeriesReader<S> {
    /// Creates a reader capped at [`DEFAULT_LIMIT`] candles per query.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            cap: DEFAULT_LIMIT,
        }
    }

    /// Lowers the per-query cap. Values above [`DEFAULT_LIMIT`] are clamped.
    #[must_use]
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap.min(DEFAULT_LIMIT);
        self
    }

    /// Returns the per-query cap.
    #[must_use]
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Returns the most recent `limit` candles, oldest first.
    ///
    /// `limit` is clamped to the reader's cap.
    ///
    /// # Errors
    ///
    /// Returns [`CandleError::InvalidInput`] for an empty symbol, or the
    /// store's error if the read fails.
    pub async fn read(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries> {
        if symbol.is_empty() {
            return Err(CandleError::InvalidInput("symbol is required".to_string()));
        }

        let limit = limit.min(self.cap);
        let candles = self.store.recent(symbol, timeframe, limit).await?;
        debug!(
            symbol,
            timeframe = %timeframe,
            limit,
            returned = candles.len(),
            "Read candle series"
        );
        Ok(CandleSeries::new(symbol, timeframe, candles))
    }

    /// Runs `query` with its defaults applied.
    ///
    /// # Errors
    ///
    /// See [`CandleSeriesReader::read`].
    pub async fn query(&self, query: &SeriesQuery) -> Result<CandleSeries> {
        self.read(
            &query.symbol,
            query.resolved_timeframe(),
            query.resolved_limit(self.cap),
        )
        .await
    }
}
