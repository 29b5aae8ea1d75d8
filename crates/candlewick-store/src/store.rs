//! Storage trait.

use async_trait::async_trait;
use candlewick_types::{Candle, CandleKey, Result, Timeframe};
use std::sync::Arc;

/// Keyed candle storage.
///
/// Implementations own all persisted candle state. Exactly one candle may
/// exist per [`CandleKey`].
#[async_trait]
pub trait CandleStore: Send + Sync + std::fmt::Debug {
    /// Looks up the candle stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`candlewick_types::CandleError::Storage`] if the backend fails.
    async fn get(&self, key: &CandleKey) -> Result<Option<Candle>>;

    /// Inserts a new candle.
    ///
    /// # Errors
    ///
    /// Returns [`candlewick_types::CandleError::Conflict`] if a candle already
    /// exists for the key.
    async fn insert(&self, candle: &Candle) -> Result<()>;

    /// Replaces open, high, low, close and volume of an existing candle.
    ///
    /// # Errors
    ///
    /// Returns [`candlewick_types::CandleError::NotFound`] if no candle exists
    /// for the key.
    async fn update(&self, candle: &Candle) -> Result<()>;

    /// Returns the `limit` most recent candles for a symbol and timeframe,
    /// ordered oldest first.
    ///
    /// The limit is applied newest-first, so the result always holds the
    /// latest buckets. A symbol or timeframe with no data yields an empty
    /// vector.
    ///
    /// # Errors
    ///
    /// Returns [`candlewick_types::CandleError::Storage`] if the backend fails.
    async fn recent(&self, symbol: &str, timeframe: Timeframe, limit: usize)
    -> Result<Vec<Candle>>;
}

#[async_trait]
impl<S: CandleStore + ?Sized> CandleStore for Arc<S> {
    async fn get(&self, key: &CandleKey) -> Result<Option<Candle>> {
        (**self).get(key).await
    }

    async fn insert(&self, candle: &Candle) -> Result<()> {
        (**self).insert(candle).await
    }

    async fn update(&self, candle: &Candle) -> Result<()> {
        (**self).update(candle).await
    }

    async fn recent(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        (**self).recent(symbol, timeframe, limit).await
    }
}
