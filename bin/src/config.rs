//! Runtime configuration.
//!
//! Configuration is read from a JSON file when `--config` is given. Every
//! field is optional; command line flags override whatever the file sets.

use candlewick_lib::{DEFAULT_LIMIT, Timeframe};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file '{path}': {source}")]
    ParseJson {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// No timeframes configured.
    #[error("At least one timeframe must be configured")]
    NoTimeframes,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// SQLite database file.
    pub(crate) database: PathBuf,
    /// Timeframes aggregated on ingest and provisioned in the store.
    pub(crate) timeframes: Vec<Timeframe>,
    /// Upper bound on candles returned by a query.
    pub(crate) query_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            timeframes: vec![Timeframe::Second1, Timeframe::Minute1, Timeframe::Hour1],
            query_limit: DEFAULT_LIMIT,
        }
    }
}

impl Config {
    /// Loads the configuration at `path`, or the defaults if `path` is `None`.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.normalized()
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Applies command line overrides.
    pub(crate) fn with_overrides(
        mut self,
        database: Option<PathBuf>,
        timeframes: Option<Vec<Timeframe>>,
    ) -> Result<Self, ConfigError> {
        if let Some(database) = database {
            self.database = database;
        }
        if let Some(timeframes) = timeframes {
            self.timeframes = timeframes;
        }
        self.normalized()
    }

    /// Sorts and deduplicates timeframes and clamps the query limit.
    fn normalized(mut self) -> Result<Self, ConfigError> {
        self.timeframes.sort_unstable();
        self.timeframes.dedup();
        if self.timeframes.is_empty() {
            return Err(ConfigError::NoTimeframes);
        }
        self.query_limit = self.query_limit.min(DEFAULT_LIMIT);
        Ok(self)
    }
}

/// Returns the default database location.
///
/// - Linux: `~/.local/share/candlewick/candles.db`
/// - macOS: `~/Library/Application Support/candlewick/candles.db`
/// - Windows: `C:\Users\<User>\AppData\Roaming\candlewick\candles.db`
///
/// Falls back to `~/.candlewick/candles.db` if the platform location cannot
/// be determined.
pub(crate) fn default_database_path() -> PathBuf {
    ProjectDirs::from("", "", "candlewick")
        .map_or_else(dirs_fallback, |proj_dirs| proj_dirs.data_dir().to_path_buf())
        .join("candles.db")
}

fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".candlewick")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("candlewick.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::load(None).unwrap();

        assert_eq!(
            config.timeframes,
            vec![Timeframe::Second1, Timeframe::Minute1, Timeframe::Hour1]
        );
        assert_eq!(config.query_limit, 1000);
        assert!(config.database.ends_with("candles.db"));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"timeframes": ["1h", "m1", "1m"], "query_limit": 5000}"#);

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.timeframes, vec![Timeframe::Minute1, Timeframe::Hour1]);
        assert_eq!(config.query_limit, 1000);
        assert_eq!(config.database, default_database_path());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_overrides(
                Some(PathBuf::from("/tmp/other.db")),
                Some(vec![Timeframe::Day1, Timeframe::Second1]),
            )
            .unwrap();

        assert_eq!(config.database, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.timeframes, vec![Timeframe::Second1, Timeframe::Day1]);
    }

    #[test]
    fn test_empty_timeframes_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{"timeframes": []}"#);

        assert!(matches!(Config::load(Some(&path)), Err(ConfigError::NoTimeframes)));
    }

    #[test]
    fn test_invalid_files() {
        let dir = TempDir::new().unwrap();

        let unknown = write(&dir, r#"{"timeframes": ["7m"]}"#);
        assert!(matches!(Config::load(Some(&unknown)), Err(ConfigError::ParseJson { .. })));

        let missing = dir.path().join("missing.json");
        assert!(matches!(Config::load(Some(&missing)), Err(ConfigError::ReadFile { .. })));
    }
}
