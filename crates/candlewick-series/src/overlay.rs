//! Indicator math over a close-price series.
//!
//! Every function returns one entry per input value, aligned by index. Entries
//! inside the warm-up window, where the indicator is not yet defined, are
//! `None`. A zero period yields all `None`.

/// Default SMA and EMA periods attached to a frame.
pub const DEFAULT_MA_PERIODS: [usize; 3] = [7, 14, 50];
/// Default Bollinger band window.
pub const DEFAULT_BBANDS_PERIOD: usize = 20;
/// Default Bollinger band width in standard deviations.
pub const DEFAULT_BBANDS_K: f64 = 2.0;
/// Default RSI period.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Simple moving average.
///
/// The value at `i` is the mean of `values[i + 1 - period..=i]`.
#[must_use]
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let divisor = period as f64;
    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = Some(sum / divisor);
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = Some(sum / divisor);
    }
    out
}

/// Exponential moving average seeded with the SMA of the first `period` values.
///
/// `multiplier = 2 / (period + 1)` and
/// `ema_t = value_t * multiplier + ema_{t-1} * (1 - multiplier)`.
#[must_use]
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(prev);
    for (i, &value) in values.iter().enumerate().skip(period) {
        prev = value.mul_add(multiplier, prev * (1.0 - multiplier));
        out[i] = Some(prev);
    }
    out
}

/// Upper, middle and lower Bollinger bands, aligned to the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bands {
    /// Middle band plus `k` standard deviations.
    pub upper: Vec<Option<f64>>,
    /// Simple moving average over the window.
    pub middle: Vec<Option<f64>>,
    /// Middle band minus `k` standard deviations.
    pub lower: Vec<Option<f64>>,
}

/// Bollinger bands using the population standard deviation of each window.
#[must_use]
pub fn bollinger(values: &[f64], period: usize, k: f64) -> Bands {
    let middle = sma(values, period);
    let mut upper = vec![None; values.len()];
    let mut lower = vec![None; values.len()];

    for (i, mean) in middle.iter().enumerate() {
        let Some(mean) = *mean else { continue };
        let window = &values[i + 1 - period..=i];
        let variance =
            window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
        let deviation = k * variance.sqrt();
        upper[i] = Some(mean + deviation);
        lower[i] = Some(mean - deviation);
    }

    Bands {
        upper,
        middle,
        lower,
    }
}

/// Relative strength index with Wilder smoothing.
///
/// The first value sits at index `period`, once `period` price changes have
/// been seen. A window with no movement reads 50; one with no losses reads 100.
#[must_use]
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    let n = period as f64;
    let (gains, losses) = values[..=period]
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0, 0.0), |(g, l), d| if d > 0.0 { (g + d, l) } else { (g, l - d) });
    let mut avg_gain = gains / n;
    let mut avg_loss = losses / n;
    out[period] = Some(strength_index(avg_gain, avg_loss));

    for i in period + 1..values.len() {
        let delta = values[i] - values[i - 1];
        avg_gain = (avg_gain * (n - 1.0) + delta.max(0.0)) / n;
        avg_loss = (avg_loss * (n - 1.0) + (-delta).max(0.0)) / n;
        out[i] = Some(strength_index(avg_gain, avg_loss));
    }
    out
}

fn strength_index(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(n: u32) -> Vec<f64> {
        (1..=n).map(f64::from).collect()
    }

    #[test]
    fn test_sma() {
        let out = sma(&ramp(5), 3);

        assert_eq!(out.len(), 5);
        assert!(out[0].is_none() && out[1].is_none());
        assert_relative_eq!(out[2].unwrap(), 2.0);
        assert_relative_eq!(out[3].unwrap(), 3.0);
        assert_relative_eq!(out[4].unwrap(), 4.0);
    }

    #[test]
    fn test_zero_period_and_short_input() {
        assert!(sma(&ramp(5), 0).iter().all(Option::is_none));
        assert!(ema(&ramp(2), 3).iter().all(Option::is_none));
        assert!(rsi(&ramp(3), 3).iter().all(Option::is_none));
        assert!(bollinger(&ramp(5), 0, 2.0).upper.iter().all(Option::is_none));
    }

    #[test]
    fn test_ema_seeded_with_sma() {
        let out = ema(&[2.0, 4.0, 6.0, 8.0], 3);

        assert!(out[1].is_none());
        assert_relative_eq!(out[2].unwrap(), 4.0);
        // multiplier 0.5: 8 * 0.5 + 4 * 0.5
        assert_relative_eq!(out[3].unwrap(), 6.0);
    }

    #[test]
    fn test_bollinger() {
        let out = bollinger(&[1.0, 3.0, 1.0, 3.0], 2, 2.0);

        assert!(out.middle[0].is_none());
        assert_relative_eq!(out.middle[1].unwrap(), 2.0);
        assert_relative_eq!(out.upper[1].unwrap(), 4.0);
        assert_relative_eq!(out.lower[1].unwrap(), 0.0);
        assert_relative_eq!(out.upper[3].unwrap(), 4.0);
    }

    #[test]
    fn test_bollinger_flat_series_collapses() {
        let out = bollinger(&[100.0; 20], 20, 2.0);

        assert_relative_eq!(out.upper[19].unwrap(), 100.0);
        assert_relative_eq!(out.lower[19].unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_extremes() {
        let rising = rsi(&ramp(20), 14);
        assert!(rising[13].is_none());
        assert_relative_eq!(rising[14].unwrap(), 100.0);

        let flat = rsi(&[5.0; 16], 14);
        assert_relative_eq!(flat[15].unwrap(), 50.0);

        let falling: Vec<f64> = ramp(20).into_iter().rev().collect();
        assert_relative_eq!(rsi(&falling, 14)[19].unwrap(), 0.0);
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        // Seed: one gain of 2, one loss of 1 -> avg_gain 1, avg_loss 0.5.
        // Next delta +1: avg_gain 1, avg_loss 0.25 -> rs 4 -> 80.
        let out = rsi(&[10.0, 12.0, 11.0, 12.0], 2);

        assert_relative_eq!(out[2].unwrap(), 100.0 - 100.0 / 3.0);
        assert_relative_eq!(out[3].unwrap(), 80.0);
    }
}
