//! Store-backed tick-to-candle aggregation.

use candlewick_store::CandleStore;
use candlewick_types::{Candle, CandleError, CandleKey, Result, Tick, Timeframe};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

type KeyLock = Arc<tokio::sync::Mutex<()>>;
type LockTable = Mutex<HashMap<(String, Timeframe), KeyLock>>;

/// A caller's hold on one pair's lock.
///
/// Dropping the last lease for a pair removes its entry, so the table only
/// holds pairs with a write in flight.
struct KeyLease<'a> {
    table: &'a LockTable,
    key: (String, Timeframe),
    lock: KeyLock,
}

impl Drop for KeyLease<'_> {
    fn drop(&mut self) {
        let Ok(mut locks) = self.table.lock() else {
            return;
        };
        // One reference in the table and one here: nobody else holds or awaits it.
        if locks.get(&self.key).is_some_and(|entry| Arc::strong_count(entry) == 2) {
            locks.remove(&self.key);
        }
    }
}

/// Store-backed candle aggregator.
///
/// The aggregator keeps no candle state of its own: every call re-reads the
/// open bucket from the store, applies the tick and writes the result back.
/// The read-modify-write sequence for one `(symbol, timeframe)` pair is
/// serialized by a per-pair async lock, so concurrent callers cannot lose
/// each other's updates. Lock entries are dropped once no caller uses them.
#[derive(Debug)]
pub struct CandleAggregator<S> {
    store: S,
    timeframes: Vec<Timeframe>,
    locks: LockTable,
}

impl<S: CandleStore> CandleAggregator<S> {
    /// Creates an aggregator writing to `store` for the given timeframes.
    ///
    /// Duplicate timeframes are ignored.
    #[must_use]
    pub fn new(store: S, timeframes: &[Timeframe]) -> Self {
        let mut timeframes = timeframes.to_vec();
        timeframes.sort_unstable();
        timeframes.dedup();

        Self {
            store,
            timeframes,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the configured timeframes, finest first.
    #[must_use]
    pub fn timeframes(&self) -> &[Timeframe] {
        &self.timeframes
    }

    /// Returns true if `timeframe` is configured.
    #[must_use]
    pub fn supports(&self, timeframe: Timeframe) -> bool {
        self.timeframes.binary_search(&timeframe).is_ok()
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Folds `tick` into the candle of its bucket for `timeframe`.
    ///
    /// Returns `true` if the tick opened a new bucket and `false` if it
    /// updated an existing one. Exactly one store write happens per call.
    ///
    /// # Errors
    ///
    /// - [`CandleError::InvalidInput`] if the tick is malformed
    /// - [`CandleError::UnsupportedTimeframe`] if `timeframe` is not configured
    /// - [`CandleError::Conflict`], [`CandleError::NotFound`] or
    ///   [`CandleError::Storage`] if the store rejects the write
    pub async fn apply_tick(&self, tick: &Tick, timeframe: Timeframe) -> Result<bool> {
        tick.validate()?;
        if !self.supports(timeframe) {
            return Err(CandleError::UnsupportedTimeframe(timeframe));
        }

        let key = CandleKey::new(
            tick.symbol.clone(),
            timeframe,
            timeframe.truncate(tick.timestamp)?,
        );
        let price = tick.mid_price();

        let lease = self.lease(&tick.symbol, timeframe)?;
        let _guard = lease.lock.lock().await;

        match self.store.get(&key).await? {
            None => {
                let candle = Candle::open_at(key, price, tick.volume_delta);
                debug_assert!(candle.is_consistent(), "opened inconsistent candle");
                self.store.insert(&candle).await?;
                debug!(
                    symbol = %candle.symbol,
                    timeframe = %timeframe,
                    bucket_start = %candle.bucket_start,
                    open = candle.open,
                    "Opened candle"
                );
                Ok(true)
            }
            Some(mut candle) => {
                candle.absorb(price, tick.volume_delta);
                debug_assert!(candle.is_consistent(), "absorb broke candle invariants");
                self.store.update(&candle).await?;
                trace!(
                    symbol = %candle.symbol,
                    timeframe = %timeframe,
                    close = candle.close,
                    volume = candle.volume,
                    "Updated candle"
                );
                Ok(false)
            }
        }
    }

    fn lease(&self, symbol: &str, timeframe: Timeframe) -> Result<KeyLease<'_>> {
        let key = (symbol.to_string(), timeframe);
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| CandleError::storage("aggregator lock table poisoned"))?;
        let lock = Arc::clone(locks.entry(key.clone()).or_default());
        Ok(KeyLease {
            table: &self.locks,
            key,
            lock,
        })
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().map_or(0, |locks| locks.len())
    }
}
