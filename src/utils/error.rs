//! Error handling for the scoring pipeline.

use thiserror::Error;

/// Main error type for the scoring pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Data-related errors (e.g. input that is not a transaction array)
    #[error("Data error: {0}")]
    DataError(String),

    /// Model artifact missing, undecodable or incompatible
    #[error("Model error: {0}")]
    ModelError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Chart rendering errors
    #[error("Chart error: {0}")]
    ChartError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// Binary model encoding errors
    #[error("Bincode error: {0}")]
    BincodeError(#[from] bincode::Error),

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

/// Result type for the scoring pipeline
pub type Result<T> = std::result::Result<T, Error>;

// Allow automatic conversion from anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
