//! Utility functions and types for the scoring pipeline.

pub mod error;
mod fs;
mod logging;

pub use error::Error;
pub use fs::{ensure_parent, write_file};
pub use logging::{init_logging, parse_level};
