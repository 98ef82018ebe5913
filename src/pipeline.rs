//! End-to-end batch run: ledger → features → scores → report.

use crate::analysis::{aggregate, normalize, AggregationStats};
use crate::ledger::load_transactions;
use crate::model::ModelArtifact;
use crate::report::{self, ScoreReport};
use crate::scoring::{score_wallets, ScoredWallet};
use crate::Result;
use std::path::PathBuf;

/// Every path a run touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Transaction ledger (JSON array)
    pub input: PathBuf,
    /// Score table (CSV)
    pub output: PathBuf,
    /// Pre-trained model artifact
    pub model: PathBuf,
    /// Distribution chart (PNG)
    pub chart: PathBuf,
    /// Analysis document (Markdown)
    pub report: PathBuf,
}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub transactions: usize,
    pub aggregation: AggregationStats,
    pub scores: Vec<ScoredWallet>,
    pub report: ScoreReport,
}

/// Run the whole job once.
///
/// The model is loaded before anything is written, so a missing or
/// incompatible artifact leaves no output behind.
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let ledger = load_transactions(&config.input)?;
    let model = ModelArtifact::load(&config.model)?;

    let (features, aggregation) = aggregate(&ledger.transactions);
    if aggregation.skipped > 0 {
        log::warn!("{} transactions had no wallet identifier and were skipped", aggregation.skipped);
    }
    if aggregation.unparseable > 0 {
        log::warn!("{} transactions had an unparseable amount or price, valued at $0", aggregation.unparseable);
    }
    log::info!("Aggregated {} wallets from {} transactions", features.len(), aggregation.used);

    let matrix = normalize(&features);
    let scores = score_wallets(&model, &matrix);

    report::write_scores(&config.output, &scores)?;
    let report = report::generate(&config.output, scores.len(), &config.chart, &config.report)?;

    Ok(RunSummary { transactions: ledger.len(), aggregation, scores, report })
}
