//! Configuration for the scoring job.
//!
//! The CLI only requires input and output paths; everything else lives here
//! and can be overridden from a TOML file or individual flags.

use crate::pipeline::PipelineConfig;
use crate::utils::error::{Error, Result};
use crate::utils::parse_level;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the pre-trained model artifact
pub const DEFAULT_MODEL_PATH: &str = "model.bin";
/// Default location of the score distribution chart
pub const DEFAULT_CHART_PATH: &str = "score_distribution.png";
/// Default location of the narrative report
pub const DEFAULT_REPORT_PATH: &str = "analysis.md";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Artifact locations
    pub paths: PathsConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Locations of the model and side artifacts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Pre-trained model artifact (bincode, or JSON when ending in `.json`)
    pub model: String,
    /// Bar chart of the score distribution (PNG)
    pub chart: String,
    /// Markdown analysis document
    pub report: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL_PATH.to_string(),
            chart: DEFAULT_CHART_PATH.to_string(),
            report: DEFAULT_REPORT_PATH.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject blank artifact paths and unknown log levels
    pub fn validate(&self) -> Result<()> {
        if parse_level(&self.logging.level).is_none() {
            return Err(Error::ConfigError(format!("unknown logging.level {:?}", self.logging.level)));
        }
        for (name, value) in [
            ("paths.model", &self.paths.model),
            ("paths.chart", &self.paths.chart),
            ("paths.report", &self.paths.report),
        ] {
            if value.trim().is_empty() {
                return Err(Error::ConfigError(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    /// Get the default configuration as a TOML string
    pub fn default_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    /// Build the per-run pipeline configuration for the given input/output pair
    pub fn pipeline(&self, input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> PipelineConfig {
        PipelineConfig {
            input: input.into(),
            output: output.into(),
            model: PathBuf::from(&self.paths.model),
            chart: PathBuf::from(&self.paths.chart),
            report: PathBuf::from(&self.paths.report),
        }
    }
}
