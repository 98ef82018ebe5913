//! # wallet-score
//! Offline credit-style scoring of lending-protocol wallets.
//!
//! One run reads a transaction ledger, aggregates per-wallet features,
//! normalizes them across the batch, scores them with a pre-trained
//! regression model and writes a score table plus a short analysis.

pub use crate::utils::error::{Error, Result};

pub mod analysis;
pub mod config;
pub mod ledger;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod utils;

pub use crate::pipeline::{run, PipelineConfig, RunSummary};
