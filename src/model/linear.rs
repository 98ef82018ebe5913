use super::RegressionModel;
use crate::analysis::FEATURE_COUNT;
use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Ordinary linear regression: `intercept + Σ weight_i * x_i`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn new(weights: Vec<f64>, intercept: f64) -> Self {
        Self { weights, intercept }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.weights.len() != FEATURE_COUNT {
            return Err(Error::ModelError(format!(
                "linear model has {} weights, expected {}",
                self.weights.len(),
                FEATURE_COUNT
            )));
        }
        if !self.intercept.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(Error::ModelError("linear model has non-finite coefficients".into()));
        }
        Ok(())
    }
}

impl RegressionModel for LinearRegressor {
    fn name(&self) -> &str {
        "linear"
    }

    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        self.intercept + self.weights.iter().zip(row.iter()).map(|(w, x)| w * x).sum::<f64>()
    }
}
