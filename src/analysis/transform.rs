//! Population-level feature scaling.
//!
//! Scaling is fit on the batch being scored and then discarded, so a
//! normalized value only means something relative to the other wallets in
//! the same run.

use super::features::{WalletFeatureVector, FEATURE_COUNT};

/// Row-major model input, one row per wallet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    pub wallets: Vec<String>,
    pub rows: Vec<[f64; FEATURE_COUNT]>,
}

impl FeatureMatrix {
    pub fn from_features(features: &[WalletFeatureVector]) -> Self {
        Self {
            wallets: features.iter().map(|f| f.wallet.clone()).collect(),
            rows: features.iter().map(WalletFeatureVector::as_row).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[col])
    }
}

/// Per-column bounds learned from one batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    pub min: [f64; FEATURE_COUNT],
    pub max: [f64; FEATURE_COUNT],
}

impl MinMaxScaler {
    /// Learn column bounds. An empty matrix yields all-zero bounds.
    pub fn fit(matrix: &FeatureMatrix) -> Self {
        let mut min = [0.0; FEATURE_COUNT];
        let mut max = [0.0; FEATURE_COUNT];
        for col in 0..FEATURE_COUNT {
            if matrix.is_empty() {
                continue;
            }
            min[col] = matrix.column(col).fold(f64::INFINITY, f64::min);
            max[col] = matrix.column(col).fold(f64::NEG_INFINITY, f64::max);
        }
        Self { min, max }
    }

    /// Map every column onto `[0, 1]`. Constant columns map to 0.
    pub fn transform(&self, matrix: &mut FeatureMatrix) {
        for row in &mut matrix.rows {
            for (col, x) in row.iter_mut().enumerate() {
                let range = self.max[col] - self.min[col];
                *x = if range > 0.0 { (*x - self.min[col]) / range } else { 0.0 };
            }
        }
    }
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Replace missing values with 0 and compress magnitudes with `ln(1 + x)`
pub fn log_transform(matrix: &mut FeatureMatrix) {
    for row in &mut matrix.rows {
        for x in row.iter_mut() {
            *x = finite_or_zero(finite_or_zero(*x).ln_1p());
        }
    }
}

/// Full transform: log1p followed by min-max scaling fit on this batch
pub fn normalize(features: &[WalletFeatureVector]) -> FeatureMatrix {
    let mut matrix = FeatureMatrix::from_features(features);
    log_transform(&mut matrix);
    let scaler = MinMaxScaler::fit(&matrix);
    scaler.transform(&mut matrix);
    log::debug!("normalized {} wallets, bounds {:?}", matrix.len(), scaler);
    matrix
}
