use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::Parser;
use stockscope_analysis::{Aggregator, analyze_symbol};
use stockscope_data::{FileSource, load_bars, lookback_range};
use stockscope_types::{AnalysisConfig, PriceSeries};
use tracing_subscriber::EnvFilter;

/// Technical indicator summary (MA, MACD, KDJ, RSI, BOLL, candlesticks)
/// for one stock, printed as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file holding an array of daily bars
    #[arg(long, required_unless_present = "symbol")]
    input: Option<PathBuf>,

    /// Ticker to load from the data root (label only with --input)
    #[arg(long)]
    symbol: Option<String>,

    /// Directory of <SYMBOL>.json price files [default: $STOCKSCOPE_DATA_ROOT or data/prices]
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// Analysis configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Calendar months of history to load for --symbol
    #[arg(long, default_value_t = 6)]
    months: u32,

    /// Last date of the loaded range for --symbol [default: today]
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Pretty-print the report
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            AnalysisConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };
    init_tracing(&config.logging.level);

    let aggregator = Aggregator::new(config)?;

    let report = if let Some(path) = &cli.input {
        let bars = load_bars(path)?;
        let symbol = cli.symbol.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        aggregator.analyze(&symbol, &PriceSeries::new(bars))?
    } else if let Some(symbol) = &cli.symbol {
        let source = cli
            .data_root
            .clone()
            .map_or_else(FileSource::from_env, FileSource::new);
        let end = cli.end.unwrap_or_else(|| Local::now().date_naive());
        let range = lookback_range(end, cli.months)
            .with_context(|| format!("{} months before {end} is out of range", cli.months))?;
        analyze_symbol(&source, symbol, range, &aggregator)?
    } else {
        bail!("either --input or --symbol is required");
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}

/// Logs go to stderr so stdout stays a single JSON document.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
