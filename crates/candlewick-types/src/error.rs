//! Error types for candlewick.

use thiserror::Error;

use crate::{CandleKey, Timeframe};

/// Result type alias for candlewick operations.
pub type Result<T> = std::result::Result<T, CandleError>;

/// Errors that can occur while aggregating, storing or reading candles.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CandleError {
    /// Malformed tick or query parameter.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The timeframe is not part of the configured set.
    #[error("Unsupported timeframe: {0}")]
    UnsupportedTimeframe(Timeframe),

    /// A candle already exists for the key.
    #[error("Candle already exists: {0}")]
    Conflict(CandleKey),

    /// No candle exists for the key.
    #[error("Candle not found: {0}")]
    NotFound(CandleKey),

    /// The backing store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CandleError {
    /// Creates a storage error from any displayable source.
    pub fn storage(source: impl std::fmt::Display) -> Self {
        Self::Storage(source.to_string())
    }

    /// Returns a short, stable label for structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::UnsupportedTimeframe(_) => "unsupported_timeframe",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
        }
    }

    /// Returns true if the error was caused by the caller's input.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::UnsupportedTimeframe(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_error_kind() {
        let key = CandleKey::new(
            "BTC_JPY",
            Timeframe::Minute1,
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        );

        assert_eq!(CandleError::Conflict(key.clone()).kind(), "conflict");
        assert_eq!(CandleError::NotFound(key).kind(), "not_found");
        assert_eq!(CandleError::storage("disk full").kind(), "storage");
        assert!(CandleError::UnsupportedTimeframe(Timeframe::Hour4).is_invalid_input());
        assert!(!CandleError::storage("disk full").is_invalid_input());
    }

    #[test]
    fn test_error_display() {
        let err = CandleError::storage("database is locked");
        assert_eq!(err.to_string(), "Storage error: database is locked");
    }
}
