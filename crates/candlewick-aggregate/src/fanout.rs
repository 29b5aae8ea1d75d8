//! Per-timeframe dispatch of ticks.

use crate::CandleAggregator;
use candlewick_store::CandleStore;
use candlewick_types::{Tick, Timeframe};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Counters collected by one timeframe lane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaneStats {
    /// Ticks folded into a candle.
    pub applied: u64,
    /// Ticks that opened a new bucket. Always `<= applied`.
    pub created: u64,
    /// Ticks dropped because the aggregator returned an error.
    pub failed: u64,
}

impl LaneStats {
    /// Returns the number of ticks the lane processed.
    #[must_use]
    pub const fn processed(&self) -> u64 {
        self.applied + self.failed
    }
}

/// Per-timeframe counters returned by [`DurationFanout::shutdown`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanoutSummary {
    /// Counters keyed by timeframe.
    pub lanes: BTreeMap<Timeframe, LaneStats>,
}

impl FanoutSummary {
    /// Returns the counters for one timeframe.
    #[must_use]
    pub fn get(&self, timeframe: Timeframe) -> Option<&LaneStats> {
        self.lanes.get(&timeframe)
    }

    /// Returns the number of failed applications across all lanes.
    #[must_use]
    pub fn total_failed(&self) -> u64 {
        self.lanes.values().map(|stats| stats.failed).sum()
    }
}

#[derive(Debug)]
struct Lane {
    timeframe: Timeframe,
    sender: mpsc::UnboundedSender<Arc<Tick>>,
    handle: JoinHandle<LaneStats>,
}

/// Dispatches every tick to one independent lane per timeframe.
///
/// Each lane owns an unbounded queue and a task that applies ticks in
/// arrival order. A lane that is slow or failing only delays itself: the
/// other lanes keep draining their own queues. Errors are logged and
/// counted, and the lane moves on to the next tick.
#[derive(Debug)]
pub struct DurationFanout {
    lanes: Vec<Lane>,
}

impl DurationFanout {
    /// Spawns one lane per timeframe configured on `aggregator`.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn start<S>(aggregator: Arc<CandleAggregator<S>>) -> Self
    where
        S: CandleStore + 'static,
    {
        let lanes = aggregator
            .timeframes()
            .iter()
            .map(|&timeframe| {
                let (sender, receiver) = mpsc::unbounded_channel();
                let handle = tokio::spawn(run_lane(Arc::clone(&aggregator), timeframe, receiver));
                Lane {
                    timeframe,
                    sender,
                    handle,
                }
            })
            .collect::<Vec<_>>();

        info!(lanes = lanes.len(), "Started timeframe lanes");
        Self { lanes }
    }

    /// Returns the timeframes served by this fanout.
    pub fn timeframes(&self) -> impl Iterator<Item = Timeframe> + '_ {
        self.lanes.iter().map(|lane| lane.timeframe)
    }

    /// Queues `tick` on every lane and returns immediately.
    pub fn on_tick(&self, tick: Tick) {
        let tick = Arc::new(tick);
        for lane in &self.lanes {
            if lane.sender.send(Arc::clone(&tick)).is_err() {
                warn!(
                    timeframe = %lane.timeframe,
                    symbol = %tick.symbol,
                    "Timeframe lane is gone, dropping tick"
                );
            }
        }
    }

    /// Closes every lane and waits until all queued ticks are applied.
    pub async fn shutdown(self) -> FanoutSummary {
        let mut summary = FanoutSummary::default();

        let handles: Vec<_> = self
            .lanes
            .into_iter()
            .map(|lane| {
                drop(lane.sender);
                (lane.timeframe, lane.handle)
            })
            .collect();

        for (timeframe, handle) in handles {
            let stats = match handle.await {
                Ok(stats) => stats,
                Err(e) => {
                    error!(timeframe = %timeframe, error = %e, "Timeframe lane aborted");
                    LaneStats::default()
                }
            };
            summary.lanes.insert(timeframe, stats);
        }

        info!(failed = summary.total_failed(), "Timeframe lanes drained");
        summary
    }
}

async fn run_lane<S: CandleStore>(
    aggregator: Arc<CandleAggregator<S>>,
    timeframe: Timeframe,
    mut receiver: mpsc::UnboundedReceiver<Arc<Tick>>,
) -> LaneStats {
    let mut stats = LaneStats::default();

    while let Some(tick) = receiver.recv().await {
        match aggregator.apply_tick(&tick, timeframe).await {
            Ok(created) => {
                stats.applied += 1;
                if created {
                    stats.created += 1;
                }
            }
            Err(e) => {
                stats.failed += 1;
                warn!(
                    timeframe = %timeframe,
                    symbol = %tick.symbol,
                    timestamp = %tick.timestamp,
                    error.kind = e.kind(),
                    error = %e,
                    "Failed to apply tick"
                );
            }
        }
    }

    debug!(
        timeframe = %timeframe,
        applied = stats.applied,
        created = stats.created,
        failed = stats.failed,
        "Timeframe lane closed"
    );
    stats
}
