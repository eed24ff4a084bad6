//! Error handling for the resume screener

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),


    /// The embedding capability returned something the scorer cannot use
    /// (wrong dimensionality, empty vector). Fatal to one invocation only.
    #[error("Embedding contract violated: {0}")]
    EmbeddingContract(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("No text could be extracted from {0}")]
    EmptyDocument(String),

    #[error("Batch of {count} documents exceeds the limit of {max}")]
    BatchTooLarge { count: usize, max: usize },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

/// Convert anyhow errors (model2vec-rs reports through anyhow) to our error type
impl From<anyhow::Error> for ScreenerError {
    fn from(err: anyhow::Error) -> Self {
        ScreenerError::ModelLoading(err.to_string())
    }
}
