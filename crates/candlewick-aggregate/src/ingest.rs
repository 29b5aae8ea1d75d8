//! Tick stream ingestion.

use crate::{DurationFanout, FanoutSummary};
use candlewick_types::Tick;
use futures::{Stream, StreamExt};
use std::future::Future;
use std::pin::pin;
use tracing::info;

/// Outcome of an [`ingest`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Ticks taken from the stream and dispatched to the lanes.
    pub received: u64,
    /// True if ingestion stopped because `shutdown` resolved.
    pub interrupted: bool,
    /// Per-timeframe counters after draining.
    pub summary: FanoutSummary,
}

/// Feeds `ticks` into `fanout` until the stream ends or `shutdown` resolves.
///
/// Once either happens no further ticks are read, every tick already
/// dispatched is applied, and the lanes are closed.
pub async fn ingest<T, F>(ticks: T, fanout: DurationFanout, shutdown: F) -> IngestReport
where
    T: Stream<Item = Tick>,
    F: Future<Output = ()>,
{
    let mut ticks = pin!(ticks);
    let mut shutdown = pin!(shutdown);
    let mut received = 0_u64;

    let interrupted = loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                info!(received, "Shutdown requested, draining timeframe lanes");
                break true;
            }
            next = ticks.next() => match next {
                Some(tick) => {
                    received += 1;
                    fanout.on_tick(tick);
                }
                None => {
                    info!(received, "Tick stream ended");
                    break false;
                }
            },
        }
    };

    let summary = fanout.shutdown().await;
    IngestReport {
        received,
        interrupted,
        summary,
    }
}
