//! SQLite candle store.

use async_trait::async_trait;
use candlewick_types::{Candle, CandleError, CandleKey, Result, Timeframe};
use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::CandleStore;

/// Configuration for the SQLite store.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path of the database file.
    pub path: PathBuf,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// How long a connection waits on a locked database.
    pub busy_timeout: Duration,
}

impl SqliteConfig {
    /// Creates a configuration for the given database file with default
    /// pool settings.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("candles.db"),
            pool_size: 8,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Raw column values of one candle row.
type RawRow = (String, i64, f64, f64, f64, f64, f64);

const COLUMNS: &str = "symbol, bucket_start, open, high, low, close, volume";

/// SQLite candle store.
///
/// Each configured timeframe gets its own table (`candles_s1`, `candles_m1`,
/// ...) keyed by `(symbol, bucket_start)`. Tables are created when the store
/// is opened; table names are derived only from [`Timeframe`].
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
    timeframes: BTreeSet<Timeframe>,
}

impl SqliteStore {
    /// Opens (or creates) the database and provisions a table for every
    /// timeframe in `timeframes`.
    ///
    /// # Errors
    ///
    /// Returns [`CandleError::Storage`] if the directory, the pool or a table
    /// cannot be created.
    pub fn open(config: &SqliteConfig, timeframes: &[Timeframe]) -> Result<Self> {
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                CandleError::storage(format!("failed to create '{}': {e}", parent.display()))
            })?;
        }

        let busy_timeout = config.busy_timeout;
        let manager = SqliteConnectionManager::file(&config.path).with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;",
            )
        });

        let pool = Pool::builder()
            .max_size(config.pool_size.max(1))
            .build(manager)
            .map_err(|e| CandleError::storage(format!("failed to create connection pool: {e}")))?;

        let timeframes: BTreeSet<Timeframe> = timeframes.iter().copied().collect();
        let conn = pool.get().map_err(CandleError::storage)?;
        for timeframe in &timeframes {
            provision(&conn, *timeframe)?;
        }

        info!(
            path = %config.path.display(),
            timeframes = ?timeframes,
            "Opened SQLite candle store"
        );

        Ok(Self { pool, timeframes })
    }

    /// Returns the timeframes that have a provisioned table.
    pub fn timeframes(&self) -> impl Iterator<Item = Timeframe> + '_ {
        self.timeframes.iter().copied()
    }

    fn is_provisioned(&self, timeframe: Timeframe) -> bool {
        self.timeframes.contains(&timeframe)
    }

    /// Runs a blocking closure against a pooled connection off the async
    /// executor.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get().map_err(CandleError::storage)?;
            f(&conn)
        })
        .await
        .map_err(|e| CandleError::storage(format!("spawn_blocking failed: {e}")))?
    }
}

fn table(timeframe: Timeframe) -> String {
    format!("candles_{}", timeframe.as_str())
}

fn provision(conn: &Connection, timeframe: Timeframe) -> Result<()> {
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (
            symbol TEXT NOT NULL,
            bucket_start INTEGER NOT NULL,
            open REAL NOT NULL,
            high REAL NOT NULL,
            low REAL NOT NULL,
            close REAL NOT NULL,
            volume REAL NOT NULL,
            PRIMARY KEY (symbol, bucket_start)
        ) WITHOUT ROWID",
        table(timeframe)
    );
    conn.execute(&sql, []).map_err(|e| {
        CandleError::storage(format!("failed to create table {}: {e}", table(timeframe)))
    })?;
    debug!(timeframe = %timeframe, "Provisioned candle table");
    Ok(())
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn into_candle(timeframe: Timeframe, row: RawRow) -> Result<Candle> {
    let (symbol, millis, open, high, low, close, volume) = row;
    let bucket_start = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| CandleError::storage(format!("invalid bucket_start {millis}")))?;
    Ok(Candle::new(
        symbol,
        timeframe,
        bucket_start,
        open,
        high,
        low,
        close,
        volume,
    ))
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if matches!(e.code, ErrorCode::ConstraintViolation)
    )
}

#[async_trait]
impl CandleStore for SqliteStore {
    async fn get(&self, key: &CandleKey) -> Result<Option<Candle>> {
        if !self.is_provisioned(key.timeframe) {
            return Ok(None);
        }

        let timeframe = key.timeframe;
        let symbol = key.symbol.clone();
        let millis = key.bucket_start.timestamp_millis();

        self.with_conn(move |conn| {
            let sql = format!(
                "SELECT {COLUMNS} FROM {} WHERE symbol = ?1 AND bucket_start = ?2",
                table(timeframe)
            );
            conn.query_row(&sql, params![symbol, millis], read_row)
                .optional()
                .map_err(CandleError::storage)?
                .map(|row| into_candle(timeframe, row))
                .transpose()
        })
        .await
    }

    async fn insert(&self, candle: &Candle) -> Result<()> {
        if !self.is_provisioned(candle.timeframe) {
            return Err(CandleError::UnsupportedTimeframe(candle.timeframe));
        }

        let candle = candle.clone();
        self.with_conn(move |conn| {
            let sql = format!(
                "INSERT INTO {} ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                table(candle.timeframe)
            );
            conn.execute(
                &sql,
                params![
                    candle.symbol,
                    candle.bucket_start.timestamp_millis(),
                    candle.open,
                    candle.high,
                    candle.low,
                    candle.close,
                    candle.volume
                ],
            )
            .map(|_| ())
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    CandleError::Conflict(candle.key())
                } else {
                    CandleError::storage(format!("failed to insert {}: {e}", candle.key()))
                }
            })
        })
        .await
    }

    async fn update(&self, candle: &Candle) -> Result<()> {
        if !self.is_provisioned(candle.timeframe) {
            return Err(CandleError::UnsupportedTimeframe(candle.timeframe));
        }

        let candle = candle.clone();
        self.with_conn(move |conn| {
            let sql = format!(
                "UPDATE {} SET open = ?1, high = ?2, low = ?3, close = ?4, volume = ?5
                 WHERE symbol = ?6 AND bucket_start = ?7",
                table(candle.timeframe)
            );
            let changed = conn
                .execute(
                    &sql,
                    params![
                        candle.open,
                        candle.high,
                        candle.low,
                        candle.close,
                        candle.volume,
                        candle.symbol,
                        candle.bucket_start.timestamp_millis()
                    ],
                )
                .map_err(|e| {
                    CandleError::storage(format!("failed to update {}: {e}", candle.key()))
                })?;

            if changed == 0 {
                return Err(CandleError::NotFound(candle.key()));
            }
            Ok(())
        })
        .await
    }

    async fn recent(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        if !self.is_provisioned(timeframe) || limit == 0 {
            return Ok(Vec::new());
        }

        let symbol = symbol.to_string();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.with_conn(move |conn| {
            let sql = format!(
                "SELECT {COLUMNS} FROM {} WHERE symbol = ?1 ORDER BY bucket_start DESC LIMIT ?2",
                table(timeframe)
            );
            let mut stmt = conn.prepare(&sql).map_err(CandleError::storage)?;
            let rows = stmt
                .query_map(params![symbol, limit], read_row)
                .map_err(CandleError::storage)?;

            let mut candles = Vec::new();
            for row in rows {
                candles.push(into_candle(timeframe, row.map_err(CandleError::storage)?)?);
            }

            // Selected newest first; callers get oldest first.
            candles.reverse();
            Ok(candles)
        })
        .await
    }
}
