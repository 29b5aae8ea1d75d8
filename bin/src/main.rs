//! candlewick CLI - Streaming OHLCV candle aggregation.

use anyhow::Result;
use candlewick_lib::Timeframe;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod logging;
mod source;

use config::Config;

#[derive(Parser)]
#[command(name = "candlewick")]
#[command(about = "Streaming OHLCV candle aggregation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides the config file)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Comma-separated timeframes to aggregate (e.g., 1s,1m,1h)
    #[arg(long, global = true, value_delimiter = ',')]
    timeframes: Option<Vec<Timeframe>>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only, no summary output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a newline-delimited JSON tick stream into candles
    Ingest {
        /// Tick file to replay. Reads stdin when omitted or "-".
        input: Option<PathBuf>,
    },

    /// Print the most recent candles for a symbol as JSON
    Query {
        /// Instrument symbol (e.g., BTC_JPY)
        symbol: String,

        /// Candle timeframe. Defaults to 1m.
        #[arg(short, long)]
        duration: Option<String>,

        /// Number of candles. Defaults to the query cap (1000).
        #[arg(short, long, allow_hyphen_values = true)]
        limit: Option<String>,

        /// Attach the default SMA, EMA, Bollinger band and RSI overlays
        #[arg(long)]
        overlays: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List supported timeframes
    Timeframes,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    logging::init(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.database, cli.timeframes)?;

    match command {
        Commands::Ingest { input } => {
            commands::ingest::ingest(&config, input.as_deref(), cli.quiet).await
        }
        Commands::Query {
            symbol,
            duration,
            limit,
            overlays,
            pretty,
        } => {
            commands::query::query(
                &config,
                &symbol,
                duration.as_deref(),
                limit.as_deref(),
                overlays,
                pretty,
            )
            .await
        }
        Commands::Timeframes => {
            commands::timeframes::list_timeframes(&config);
            Ok(())
        }
    }
}
