use thiserror::Error;

/// Failures that abort a supply chain run
#[derive(Error, Debug)]
pub enum SupplyChainError {
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Data generation failed: {reason}")]
    Generation { reason: String },

    #[error("Aggregation failed: {reason}")]
    Aggregation { reason: String },

    #[error("Insufficient data for trend fit: need at least 2 distinct days, got {distinct_days}")]
    InsufficientData { distinct_days: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SupplyChainError {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config { reason: reason.into() }
    }

    pub fn generation(reason: impl Into<String>) -> Self {
        Self::Generation { reason: reason.into() }
    }

    pub fn aggregation(reason: impl Into<String>) -> Self {
        Self::Aggregation { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, SupplyChainError>;
