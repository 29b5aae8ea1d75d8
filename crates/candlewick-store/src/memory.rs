//! In-process candle store.

use async_trait::async_trait;
use candlewick_types::{Candle, CandleError, CandleKey, Result, Timeframe};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::CandleStore;

type Slot = (Timeframe, String, DateTime<Utc>);

/// Ordered in-process candle store.
///
/// All timeframes share one keyspace ordered by timeframe, symbol and
/// bucket start, so a range scan for one pair is a contiguous slice.
#[derive(Debug, Default)]
pub struct MemoryStore {
    candles: RwLock<BTreeMap<Slot, Candle>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored candles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.read().map_or(0, |candles| candles.len())
    }

    /// Returns true if no candles are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of candles stored for one symbol and timeframe.
    #[must_use]
    pub fn count(&self, symbol: &str, timeframe: Timeframe) -> usize {
        self.candles.read().map_or(0, |candles| {
            candles.range(bounds(symbol, timeframe)).count()
        })
    }
}

fn slot(key: &CandleKey) -> Slot {
    (key.timeframe, key.symbol.clone(), key.bucket_start)
}

fn bounds(symbol: &str, timeframe: Timeframe) -> std::ops::RangeInclusive<Slot> {
    (timeframe, symbol.to_string(), DateTime::<Utc>::MIN_UTC)
        ..=(timeframe, symbol.to_string(), DateTime::<Utc>::MAX_UTC)
}

fn poisoned<T>(_: T) -> CandleError {
    CandleError::storage("memory store lock poisoned")
}

#[async_trait]
impl CandleStore for MemoryStore {
    async fn get(&self, key: &CandleKey) -> Result<Option<Candle>> {
        let candles = self.candles.read().map_err(poisoned)?;
        Ok(candles.get(&slot(key)).cloned())
    }

    async fn insert(&self, candle: &Candle) -> Result<()> {
        let key = candle.key();
        let mut candles = self.candles.write().map_err(poisoned)?;
        if candles.contains_key(&slot(&key)) {
            return Err(CandleError::Conflict(key));
        }
        candles.insert(slot(&key), candle.clone());
        Ok(())
    }

    async fn update(&self, candle: &Candle) -> Result<()> {
        let key = candle.key();
        let mut candles = self.candles.write().map_err(poisoned)?;
        let Some(stored) = candles.get_mut(&slot(&key)) else {
            return Err(CandleError::NotFound(key));
        };
        stored.open = candle.open;
        stored.high = candle.high;
        stored.low = candle.low;
        stored.close = candle.close;
        stored.volume = candle.volume;
        Ok(())
    }

    async fn recent(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let candles = self.candles.read().map_err(poisoned)?;
        let mut result: Vec<Candle> = candles
            .range(bounds(symbol, timeframe))
            .rev()
            .take(limit)
            .map(|(_, candle)| candle.clone())
            .collect();
        result.reverse();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeDelta, TimeZone};

    fn minute(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + TimeDelta::minutes(n)
    }

    fn candle(symbol: &str, n: i64, price: f64) -> Candle {
        Candle::open_at(CandleKey::new(symbol, Timeframe::Minute1, minute(n)), price, 1.0)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        let bar = candle("BTC_JPY", 0, 100.0);

        store.insert(&bar).await.unwrap();

        assert_eq!(store.get(&bar.key()).await.unwrap(), Some(bar));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_conflict() {
        let store = MemoryStore::new();
        let bar = candle("BTC_JPY", 0, 100.0);

        store.insert(&bar).await.unwrap();
        let err = store.insert(&bar).await.unwrap_err();

        assert!(matches!(err, CandleError::Conflict(key) if key == bar.key()));
    }

    #[tokio::test]
    async fn test_update() {
        let store = MemoryStore::new();
        let mut bar = candle("BTC_JPY", 0, 100.0);
        store.insert(&bar).await.unwrap();

        bar.absorb(110.0, 2.0);
        store.update(&bar).await.unwrap();

        let stored = store.get(&bar.key()).await.unwrap().unwrap();
        assert_relative_eq!(stored.high, 110.0);
        assert_relative_eq!(stored.close, 110.0);
        assert_relative_eq!(stored.volume, 3.0);
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let store = MemoryStore::new();
        let bar = candle("BTC_JPY", 0, 100.0);

        let err = store.update(&bar).await.unwrap_err();
        assert!(matches!(err, CandleError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_recent_returns_latest_ascending() {
        let store = MemoryStore::new();
        for n in 0..10 {
            store.insert(&candle("BTC_JPY", n, 100.0 + n as f64)).await.unwrap();
        }
        store.insert(&candle("ETH_JPY", 20, 1.0)).await.unwrap();

        let bars = store.recent("BTC_JPY", Timeframe::Minute1, 3).await.unwrap();
        let starts: Vec<_> = bars.iter().map(|c| c.bucket_start).collect();

        assert_eq!(starts, vec![minute(7), minute(8), minute(9)]);
        assert_eq!(store.count("BTC_JPY", Timeframe::Minute1), 10);
    }

    #[tokio::test]
    async fn test_recent_unknown_pair_is_empty() {
        let store = MemoryStore::new();
        store.insert(&candle("BTC_JPY", 0, 100.0)).await.unwrap();

        assert!(store.recent("UNKNOWN", Timeframe::Minute1, 100).await.unwrap().is_empty());
        assert!(store.recent("BTC_JPY", Timeframe::Hour1, 100).await.unwrap().is_empty());
    }
}
