//! Pre-trained regression models.
//!
//! A model is shipped as a [`ModelArtifact`]: a small versioned envelope that
//! records which features it was trained on, wrapped around the estimator
//! itself. Artifacts are bincode-encoded unless the path ends in `.json`.
//! Nothing here trains a model.

pub mod forest;
pub mod linear;

pub use forest::{ForestRegressor, RegressionTree, TreeNode};
pub use linear::LinearRegressor;

use crate::analysis::{FeatureMatrix, FEATURE_COLUMNS, FEATURE_COUNT};
use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Artifact layout version understood by this build
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Anything that maps a normalized feature row to a raw score
pub trait RegressionModel {
    /// Short estimator name for logs
    fn name(&self) -> &str;

    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> f64;

    /// One raw score per matrix row, in row order
    fn predict(&self, matrix: &FeatureMatrix) -> Vec<f64> {
        matrix.rows.iter().map(|row| self.predict_row(row)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Estimator {
    Linear(LinearRegressor),
    Forest(ForestRegressor),
}

/// Serialized model envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    /// Feature names in the column order the estimator expects
    pub features: Vec<String>,
    pub estimator: Estimator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Bincode,
    Json,
}

impl Encoding {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            | Some(ext) if ext.eq_ignore_ascii_case("json") => Encoding::Json,
            | _ => Encoding::Bincode,
        }
    }
}

impl ModelArtifact {
    /// Wrap an estimator trained on the standard feature columns
    pub fn new(estimator: Estimator) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            features: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            estimator,
        }
    }

    /// Check that this artifact can score the features this crate produces
    pub fn validate(&self) -> Result<()> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(Error::ModelError(format!(
                "unsupported model format version {} (expected {})",
                self.format_version, MODEL_FORMAT_VERSION
            )));
        }
        if self.features.len() != FEATURE_COUNT
            || self.features.iter().zip(FEATURE_COLUMNS.iter()).any(|(have, want)| have != want)
        {
            return Err(Error::ModelError(format!(
                "model was trained on features {:?}, expected {:?}",
                self.features, FEATURE_COLUMNS
            )));
        }
        match &self.estimator {
            | Estimator::Linear(m) => m.validate(),
            | Estimator::Forest(m) => m.validate(),
        }
    }

    /// Load and validate an artifact. Any failure is fatal to the run.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            Error::ModelError(format!("cannot read model artifact {}: {}", path.display(), e))
        })?;
        let artifact: ModelArtifact = match Encoding::for_path(path) {
            | Encoding::Json => serde_json::from_slice(&bytes).map_err(|e| {
                Error::ModelError(format!("cannot decode {}: {}", path.display(), e))
            })?,
            | Encoding::Bincode => bincode::deserialize(&bytes).map_err(|e| {
                Error::ModelError(format!("cannot decode {}: {}", path.display(), e))
            })?,
        };
        artifact.validate()?;
        log::info!("Loaded {} model from {}", artifact.name(), path.display());
        Ok(artifact)
    }

    /// Write the artifact using the encoding implied by `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = match Encoding::for_path(path) {
            | Encoding::Json => serde_json::to_vec_pretty(self)?,
            | Encoding::Bincode => bincode::serialize(self)?,
        };
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl RegressionModel for ModelArtifact {
    fn name(&self) -> &str {
        match &self.estimator {
            | Estimator::Linear(m) => m.name(),
            | Estimator::Forest(m) => m.name(),
        }
    }

    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        match &self.estimator {
            | Estimator::Linear(m) => m.predict_row(row),
            | Estimator::Forest(m) => m.predict_row(row),
        }
    }
}
