//! Error types for the holobiome library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum HoloError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{0}' in metadata")]
    MissingColumn(String),

    #[error("Row {row} has no study_id")]
    MissingStudyId { row: usize },

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, HoloError>;
