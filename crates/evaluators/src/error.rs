use std::path::PathBuf;
use thiserror::Error;

/// Result type for evaluator setup
pub type Result<T> = std::result::Result<T, EvaluatorError>;

/// Configuration errors; all of them surface before allocation starts
#[derive(Error, Debug)]
pub enum EvaluatorError {
    /// No factory registered under the requested type name
    #[error("Unknown evaluator type: {0}")]
    UnknownType(String),

    /// Config or type-specific params failed to parse or validate
    #[error("Invalid evaluator configuration: {0}")]
    InvalidConfig(String),

    /// Config file exists but could not be read
    #[error("Failed to read evaluator config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EvaluatorError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
