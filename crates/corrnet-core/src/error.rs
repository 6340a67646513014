//! Error type shared by the input, pipeline and output layers.

use thiserror::Error;

/// Errors raised around the network phases. The phases themselves are total.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("input error: {0}")]
    Input(String),

    #[error("failed to read correlation table: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialise network: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
