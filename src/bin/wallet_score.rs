//! CLI entrypoint: score every wallet in a transaction ledger.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use wallet_score::config::Config;
use wallet_score::utils::init_logging;

#[derive(Debug, Parser)]
#[command(name = "wallet-score", author, version, about = "Score wallets from a transaction ledger", long_about = None)]
struct Args {
    /// Path to the input JSON ledger
    #[arg(long, required_unless_present = "print_default_config")]
    input: Option<PathBuf>,

    /// Path to the output CSV score table
    #[arg(long, required_unless_present = "print_default_config")]
    output: Option<PathBuf>,

    /// Optional configuration file (TOML)
    #[arg(short, long, env = "WALLET_SCORE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the model artifact path
    #[arg(long)]
    model: Option<String>,

    /// Override the chart image path
    #[arg(long)]
    chart: Option<String>,

    /// Override the analysis document path
    #[arg(long)]
    report: Option<String>,

    /// Print the default configuration to stdout and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        println!("{}", Config::default_toml()?);
        return Ok(());
    }

    let mut config = match &args.config {
        | Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        | None => Config::default(),
    };
    init_logging(&config.logging.level);

    if let Some(model) = args.model {
        config.paths.model = model;
    }
    if let Some(chart) = args.chart {
        config.paths.chart = chart;
    }
    if let Some(report) = args.report {
        config.paths.report = report;
    }
    config.validate()?;

    let input = args.input.context("--input is required")?;
    let output = args.output.context("--output is required")?;
    let pipeline = config.pipeline(input, output);

    let summary = wallet_score::run(&pipeline).context("Scoring run failed")?;
    log::info!(
        "Scored {} wallets ({} transactions, {} skipped); report at {}",
        summary.scores.len(),
        summary.transactions,
        summary.aggregation.skipped,
        pipeline.report.display()
    );
    Ok(())
}
