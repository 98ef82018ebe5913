//! Score table output and the human-readable analysis.
//!
//! The reporter works from the score table on disk rather than from memory:
//! it reads back what was just written, checks the row count, and builds the
//! distribution chart and statistics from that.

pub mod buckets;
pub mod chart;
pub mod stats;

pub use buckets::{bucket_index, bucket_label, bucket_scores, ScoreBucket};
pub use stats::Describe;

use crate::scoring::ScoredWallet;
use crate::utils::ensure_parent;
use crate::utils::error::{Error, Result};
use std::fmt::Write as _;
use std::path::{Component, Path};

/// Scores at or below this are "low"
pub const LOW_SCORE_MAX: u32 = 300;
/// Scores at or above this are "high"
pub const HIGH_SCORE_MIN: u32 = 700;

const SCORE_COLUMN: &str = "credit_score";

/// Write `userWallet,credit_score` rows. The header is written even when
/// there are no wallets.
pub fn write_scores(path: &Path, scores: &[ScoredWallet]) -> Result<()> {
    ensure_parent(path)?;
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record(["userWallet", SCORE_COLUMN])?;
    for row in scores {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    log::info!("Credit scores written to {}", path.display());
    Ok(())
}

/// Read a score table produced by [`write_scores`]
pub fn read_scores(path: &Path) -> Result<Vec<ScoredWallet>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.deserialize::<ScoredWallet>() {
        out.push(rec?);
    }
    Ok(out)
}

/// Everything the narrative document is built from
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    pub buckets: Vec<ScoreBucket>,
    pub low: Describe,
    pub high: Describe,
}

impl ScoreReport {
    pub fn from_scores(scores: &[ScoredWallet]) -> Self {
        let low: Vec<f64> =
            scores.iter().filter(|s| s.score <= LOW_SCORE_MAX).map(|s| s.score as f64).collect();
        let high: Vec<f64> =
            scores.iter().filter(|s| s.score >= HIGH_SCORE_MIN).map(|s| s.score as f64).collect();
        Self {
            buckets: bucket_scores(scores.iter().map(|s| s.score)),
            low: Describe::of(&low),
            high: Describe::of(&high),
        }
    }

    /// Markdown analysis embedding the chart at `chart_ref`
    pub fn to_markdown(&self, chart_ref: &str) -> String {
        let mut md = String::new();
        md.push_str("# Wallet Credit Score Analysis\n\n");
        md.push_str("## Score Distribution\n\n");
        let _ = writeln!(md, "![Score Distribution]({})\n", chart_ref);
        md.push_str("| Score Range | Wallets |\n|---|---|\n");
        for bucket in &self.buckets {
            let _ = writeln!(md, "| {} | {} |", bucket.label, bucket.count);
        }
        md.push('\n');

        let _ = writeln!(md, "## Behavior of Low-Scoring Wallets (0-{})\n", LOW_SCORE_MAX);
        md.push_str(
            "- Tend to have **low deposit amounts**, **high borrow-to-deposit ratios**, \
             **few transactions**, and **short activity duration**.\n",
        );
        md.push_str("- Statistical summary:\n\n");
        let _ = writeln!(md, "```\n{}\n```\n", self.low.to_table(SCORE_COLUMN));

        let _ = writeln!(md, "## Behavior of High-Scoring Wallets ({}-1000)\n", HIGH_SCORE_MIN);
        md.push_str(
            "- Typically show **high deposits**, **low borrowing**, \
             **high transaction counts**, and **longer active periods**.\n",
        );
        md.push_str("- Statistical summary:\n\n");
        let _ = writeln!(md, "```\n{}\n```", self.high.to_table(SCORE_COLUMN));
        md
    }
}

/// Link to the chart as seen from the report's directory. Markdown resolves
/// image paths against the document, not the working directory.
fn chart_reference(report: &Path, chart: &Path) -> String {
    let (Ok(report_abs), Ok(chart_abs)) = (std::path::absolute(report), std::path::absolute(chart)) else {
        return chart.display().to_string();
    };
    let from = lexical_components(report_abs.parent().unwrap_or(Path::new("")));
    let to = lexical_components(&chart_abs);

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    // Nothing shared (different drive): only an absolute link works
    if common == 0 {
        return chart_abs.display().to_string();
    }
    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(to[common..].iter().map(|c| c.as_os_str().to_string_lossy().into_owned()));
    parts.join("/")
}

/// Path components with `.` dropped and `..` folded into its parent
fn lexical_components(path: &Path) -> Vec<Component<'_>> {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            | Component::CurDir => {}
            | Component::ParentDir if matches!(out.last(), Some(Component::Normal(_))) => {
                out.pop();
            }
            | other => out.push(other),
        }
    }
    out
}

/// Read back the score table, render the chart and write the analysis.
///
/// `expected_rows` is the number of wallets that were scored; a table with a
/// different row count is a [`Error::DataError`].
pub fn generate(table: &Path, expected_rows: usize, chart_path: &Path, report_path: &Path) -> Result<ScoreReport> {
    let scores = read_scores(table)?;
    if scores.len() != expected_rows {
        return Err(Error::DataError(format!(
            "{} holds {} rows after writing {} scores",
            table.display(),
            scores.len(),
            expected_rows
        )));
    }

    let report = ScoreReport::from_scores(&scores);
    ensure_parent(chart_path)?;
    chart::render_distribution(&report.buckets, chart_path)?;

    log::info!("Writing {}", report_path.display());
    crate::utils::write_file(report_path, report.to_markdown(&chart_reference(report_path, chart_path)))?;
    Ok(report)
}
