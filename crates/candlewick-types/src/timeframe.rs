//! Candle bucketing timeframe definitions.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{CandleError, Result};

/// Candle bucketing timeframe.
///
/// Variants are declared from finest to coarsest, so the derived ordering
/// sorts by granularity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Timeframe {
    /// 1-second bars.
    #[serde(rename = "s1", alias = "1s")]
    Second1,
    /// 1-minute bars.
    #[default]
    #[serde(rename = "m1", alias = "1m")]
    Minute1,
    /// 5-minute bars.
    #[serde(rename = "m5", alias = "5m")]
    Minute5,
    /// 15-minute bars.
    #[serde(rename = "m15", alias = "15m")]
    Minute15,
    /// 30-minute bars.
    #[serde(rename = "m30", alias = "30m")]
    Minute30,
    /// 1-hour bars.
    #[serde(rename = "h1", alias = "1h")]
    Hour1,
    /// 4-hour bars.
    #[serde(rename = "h4", alias = "4h")]
    Hour4,
    /// Daily bars.
    #[serde(rename = "d1", alias = "1d")]
    Day1,
}

impl Timeframe {
    /// Returns the bucket width in seconds.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        match self {
            Self::Second1 => 1,
            Self::Minute1 => 60,
            Self::Minute5 => 300,
            Self::Minute15 => 900,
            Self::Minute30 => 1800,
            Self::Hour1 => 3600,
            Self::Hour4 => 14400,
            Self::Day1 => 86400,
        }
    }

    /// Returns the bucket width as a [`TimeDelta`].
    #[must_use]
    pub const fn as_delta(&self) -> TimeDelta {
        TimeDelta::seconds(self.seconds())
    }

    /// Returns the start of the bucket containing `timestamp`.
    ///
    /// Buckets are aligned to the Unix epoch, so the bucket is
    /// `[truncate(t), truncate(t) + width)`.
    ///
    /// # Errors
    ///
    /// Returns [`CandleError::InvalidInput`] if the timestamp cannot be
    /// represented at nanosecond precision.
    pub fn truncate(&self, timestamp: DateTime<Utc>) -> Result<DateTime<Utc>> {
        timestamp.duration_trunc(self.as_delta()).map_err(|e| {
            CandleError::InvalidInput(format!("cannot truncate {timestamp} to {self}: {e}"))
        })
    }

    /// Returns the timeframe as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Second1 => "s1",
            Self::Minute1 => "m1",
            Self::Minute5 => "m5",
            Self::Minute15 => "m15",
            Self::Minute30 => "m30",
            Self::Hour1 => "h1",
            Self::Hour4 => "h4",
            Self::Day1 => "d1",
        }
    }

    /// Returns all available timeframes, finest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Second1,
            Self::Minute1,
            Self::Minute5,
            Self::Minute15,
            Self::Minute30,
            Self::Hour1,
            Self::Hour4,
            Self::Day1,
        ]
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s1" | "1s" | "second" | "second1" => Ok(Self::Second1),
            "m1" | "1m" | "minute" | "minute1" => Ok(Self::Minute1),
            "m5" | "5m" | "minute5" => Ok(Self::Minute5),
            "m15" | "15m" | "minute15" => Ok(Self::Minute15),
            "m30" | "30m" | "minute30" => Ok(Self::Minute30),
            "h1" | "1h" | "hour" | "hour1" => Ok(Self::Hour1),
            "h4" | "4h" | "hour4" => Ok(Self::Hour4),
            "d1" | "1d" | "day" | "day1" | "daily" => Ok(Self::Day1),
            _ => Err(TimeframeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid timeframe string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeframeParseError(String);

impl std::fmt::Display for TimeframeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid timeframe '{}', expected one of: s1, m1, m5, m15, m30, h1, h4, d1",
            self.0
        )
    }
}

impl std::error::Error for TimeframeParseError {}

impl From<TimeframeParseError> for CandleError {
    fn from(err: TimeframeParseError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
