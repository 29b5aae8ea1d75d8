//! Timeframes command implementation.

use crate::config::Config;
use candlewick_lib::Timeframe;

/// List supported timeframes, marking the configured ones.
pub(crate) fn list_timeframes(config: &Config) {
    println!("{:<10} {:>10} {:>8}", "TIMEFRAME", "SECONDS", "ACTIVE");
    println!("{}", "-".repeat(30));

    for timeframe in Timeframe::all() {
        let active = if config.timeframes.contains(timeframe) { "yes" } else { "" };
        println!(
            "{:<10} {:>10} {:>8}",
            timeframe.as_str(),
            timeframe.seconds(),
            active
        );
    }

    println!("\nDatabase: {}", config.database.display());
}
