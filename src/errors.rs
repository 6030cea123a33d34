//! Error types for return-series analysis

use thiserror::Error;

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while preparing or analysing a price series
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },

    #[error("Degenerate distribution: standard deviation is {std_dev}, bins are undefined")]
    DegenerateDistribution { std_dev: f64 },

    #[error("Unsupported interval: {interval}")]
    UnsupportedInterval { interval: String },

    #[error("Invalid return kind: {kind} (expected C-C, H-L or O-C)")]
    InvalidReturnKind { kind: String },

    #[error("Invalid price table: {message}")]
    InvalidPriceTable { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
}

impl AnalysisError {
    pub(crate) fn insufficient(message: impl Into<String>) -> Self {
        AnalysisError::InsufficientData {
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for AnalysisError {
    fn from(err: config::ConfigError) -> Self {
        AnalysisError::Config {
            message: err.to_string(),
        }
    }
}
