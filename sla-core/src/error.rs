//! Error types for SLA core

use thiserror::Error;

/// Result type for SLA core operations
pub type Result<T> = std::result::Result<T, Error>;

/// SLA core errors
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration (bad duration tables, multipliers, bounds)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
