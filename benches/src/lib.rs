//! Benchmark utilities for candlewick.

use candlewick_lib::Tick;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// Parameters of a synthetic tick stream.
#[derive(Debug, Clone)]
pub struct TickStreamConfig {
    /// Symbols quoted round-robin.
    pub symbols: Vec<String>,
    /// Number of ticks to generate.
    pub count: usize,
    /// Gap between consecutive ticks.
    pub interval: TimeDelta,
    /// Starting mid price.
    pub start_price: f64,
    /// Random walk seed.
    pub seed: u64,
}

impl Default for TickStreamConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["BTC_JPY".to_string()],
            count: 10_000,
            interval: TimeDelta::milliseconds(250),
            start_price: 5_000_000.0,
            seed: 42,
        }
    }
}

/// Generates a deterministic random-walk tick stream.
#[must_use]
pub fn synthetic_ticks(config: &TickStreamConfig) -> Vec<Tick> {
    let mut state = config.seed.max(1);
    let mut mid = config.start_price;
    let mut timestamp = start_time();

    (0..config.count)
        .map(|i| {
            let step = (next_unit(&mut state) - 0.5) * config.start_price * 1e-4;
            mid = (mid + step).max(1.0);
            let spread = mid * 1e-5;
            let volume = next_unit(&mut state) * 0.1;
            let symbol = &config.symbols[i % config.symbols.len()];

            let tick = Tick::new(symbol.clone(), timestamp, mid - spread, mid + spread, volume);
            timestamp += config.interval;
            tick
        })
        .collect()
}

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// xorshift64 step mapped to `[0, 1)`.
fn next_unit(state: &mut u64) -> f64 {
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    (*state >> 11) as f64 / (1_u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_ticks_are_valid_and_ordered() {
        let config = TickStreamConfig {
            symbols: vec!["A".to_string(), "B".to_string()],
            count: 500,
            ..TickStreamConfig::default()
        };
        let ticks = synthetic_ticks(&config);

        assert_eq!(ticks.len(), 500);
        assert!(ticks.iter().all(|t| t.validate().is_ok()));
        assert!(ticks.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(ticks[1].symbol, "B");
        assert_eq!(synthetic_ticks(&config), ticks);
    }
}
