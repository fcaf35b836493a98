//! Kairos CLI: market-context reports from the command line.
//!
//! Commands:
//! - `analyze`: fetch history for one or more symbols and print the
//!   indicator report (or JSON with `--json`)

mod logging;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use kairos_core::data::{FetchChain, SyntheticProvider};
use kairos_core::{AnalysisConfig, AnalysisSummary, EngineError, IndicatorEngine};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "kairos", about = "Kairos CLI: technical-indicator market context")]
struct Cli {
    /// Emit logs as JSON.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one or more symbols (e.g., SPY AAPL BTC).
    Analyze {
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the full result as JSON instead of the text report.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Skip the headline lookup.
        #[arg(long, default_value_t = false)]
        no_news: bool,

        /// Offline mode: deterministic synthetic prices, no network access.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Calendar days of history the report covers (overrides the config file).
        #[arg(long)]
        lookback_days: Option<u32>,

        /// End of the fetch window (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,
    },
}

struct AnalyzeArgs {
    symbols: Vec<String>,
    config: Option<PathBuf>,
    json: bool,
    no_news: bool,
    synthetic: bool,
    lookback_days: Option<u32>,
    as_of: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_json);

    match cli.command {
        Commands::Analyze {
            symbols,
            config,
            json,
            no_news,
            synthetic,
            lookback_days,
            as_of,
        } => run_analyze(AnalyzeArgs {
            symbols,
            config,
            json,
            no_news,
            synthetic,
            lookback_days,
            as_of,
        }),
    }
}

fn load_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(days) = args.lookback_days {
        config.lookback_days = days;
    }
    if args.no_news {
        config.news_enabled = false;
    }
    config.validate()?;
    Ok(config)
}

fn build_engine(args: &AnalyzeArgs, config: AnalysisConfig) -> Result<IndicatorEngine> {
    let engine = if args.synthetic {
        let chain = FetchChain::new(vec![Arc::new(SyntheticProvider::new())]);
        IndicatorEngine::new(chain, config)
    } else {
        IndicatorEngine::yahoo(config)?
    };

    let as_of = args
        .as_of
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("--as-of must be YYYY-MM-DD")?;

    Ok(match as_of {
        Some(date) => engine.with_as_of(date),
        None => engine,
    })
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = load_config(&args)?;
    let engine = build_engine(&args, config)?;
    let (start, end) = engine.window()?;
    info!(symbols = args.symbols.len(), %start, %end, synthetic = args.synthetic, "analyzing");

    let results = engine.analyze_many(args.symbols.as_slice());
    let mut failed = 0;
    let mut summaries: Vec<&AnalysisSummary> = Vec::new();

    for (symbol, result) in args.symbols.iter().zip(&results) {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(err) => {
                failed += 1;
                report_error(symbol, err);
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        let blocks: Vec<&str> = summaries.iter().map(|s| s.summary.as_str()).collect();
        if !blocks.is_empty() {
            println!("{}", blocks.join("\n\n"));
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn report_error(symbol: &str, err: &EngineError) {
    eprintln!("Error for {symbol}: {err}");
    if let EngineError::DataNotFound { attempts, .. } = err {
        for attempt in attempts {
            eprintln!("  {} via {}: {}", attempt.symbol, attempt.provider, attempt.error);
        }
    }
}
