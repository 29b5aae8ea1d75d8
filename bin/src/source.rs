//! Newline-delimited JSON tick source.

use anyhow::{Context, Result};
use candlewick_lib::Tick;
use futures::Stream;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{error, warn};

/// Boxed line reader over a file or stdin.
pub(crate) type TickReader = Box<dyn AsyncBufRead + Unpin + Send>;

/// Opens `path` for reading, or stdin when `path` is `None` or `-`.
pub(crate) async fn open(path: Option<&Path>) -> Result<TickReader> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open tick file: {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}

/// Parses one tick per line.
///
/// Blank lines are ignored. Lines that are not valid tick JSON are logged
/// and skipped. The stream ends at end of input or on a read error.
pub(crate) fn ndjson_ticks<R>(reader: R) -> impl Stream<Item = Tick>
where
    R: AsyncBufRead + Unpin,
{
    futures::stream::unfold((reader.lines(), 0_u64), |(mut lines, mut line_no)| async move {
        loop {
            line_no += 1;
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<Tick>(line) {
                        Ok(tick) => return Some((tick, (lines, line_no))),
                        Err(e) => warn!(line = line_no, error = %e, "Skipping malformed tick"),
                    }
                }
                Ok(None) => return None,
                Err(e) => {
                    error!(line = line_no, error = %e, "Failed to read tick source");
                    return None;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::io::Write;

    const INPUT: &str = r#"{"product_code":"BTC_JPY","timestamp":"2024-01-01T00:00:00.5Z","best_bid":100.0,"best_ask":102.0,"volume":1.0,"tick_id":7}

not json
{"symbol":"ETH_JPY","timestamp":"2024-01-01T00:00:01Z","bid":10.0,"ask":11.0,"volume_delta":0.5}
{"symbol":"ETH_JPY","timestamp":"yesterday","bid":10.0,"ask":11.0,"volume_delta":0.5}
"#;

    #[tokio::test]
    async fn test_ndjson_skips_bad_lines() {
        let ticks: Vec<Tick> = ndjson_ticks(INPUT.as_bytes()).collect().await;

        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].symbol, "BTC_JPY");
        assert_eq!(ticks[1].symbol, "ETH_JPY");
        assert!((ticks[1].mid_price() - 10.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let ticks: Vec<Tick> = ndjson_ticks(&b""[..]).collect().await;
        assert!(ticks.is_empty());
    }

    #[tokio::test]
    async fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(INPUT.as_bytes()).unwrap();

        let reader = open(Some(file.path())).await.unwrap();
        assert_eq!(ndjson_ticks(reader).count().await, 2);

        assert!(open(Some(Path::new("/nonexistent/ticks.ndjson"))).await.is_err());
    }
}
