//! Raw model output → bounded integer credit scores.

use crate::analysis::FeatureMatrix;
use crate::model::RegressionModel;
use serde::{Deserialize, Serialize};

/// Upper bound of the credit score scale
pub const MAX_SCORE: u32 = 1000;

/// Final per-wallet score, as written to the score table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredWallet {
    #[serde(rename = "userWallet")]
    pub wallet: String,
    #[serde(rename = "credit_score")]
    pub score: u32,
}

/// Rescale raw scores relative to the batch maximum.
///
/// `score = trunc(clamp(raw / max_raw, 0, 1) * 1000)`. If the batch maximum
/// is not a positive finite number nothing can be scaled and every wallet
/// scores 0.
pub fn rescale(raw: &[f64]) -> Vec<u32> {
    let max_raw = raw.iter().copied().filter(|r| r.is_finite()).fold(f64::NEG_INFINITY, f64::max);
    if !(max_raw.is_finite() && max_raw > 0.0) {
        if !raw.is_empty() {
            log::warn!("no positive raw score in batch (max {}), all scores are 0", max_raw);
        }
        return vec![0; raw.len()];
    }
    raw.iter()
        .map(|r| {
            let ratio = if r.is_finite() { (r / max_raw).clamp(0.0, 1.0) } else { 0.0 };
            (ratio * MAX_SCORE as f64) as u32
        })
        .collect()
}

/// Run the model over the normalized matrix and pair scores with wallets
pub fn score_wallets<M: RegressionModel + ?Sized>(model: &M, matrix: &FeatureMatrix) -> Vec<ScoredWallet> {
    let raw = model.predict(matrix);
    let scores = rescale(&raw);
    log::info!("Scored {} wallets with {} model", scores.len(), model.name());
    matrix
        .wallets
        .iter()
        .zip(scores)
        .map(|(wallet, score)| ScoredWallet { wallet: wallet.clone(), score })
        .collect()
}
