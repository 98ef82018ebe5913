//! Feature engineering for wallet scoring

pub mod features;
pub mod transform;

pub use features::{aggregate, AggregationStats, WalletFeatureVector, FEATURE_COLUMNS, FEATURE_COUNT};
pub use transform::{normalize, FeatureMatrix, MinMaxScaler};
