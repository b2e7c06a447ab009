//! Error types for the pawprint pipeline

use thiserror::Error;

/// Errors that can occur during the transformation pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to read input file {path}: {source}")]
    LoadError {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed CSV input: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unparseable date value: {0}")]
    DateParseError(String),

    #[error("Malformed sleep duration (expected H:MM): {0}")]
    DurationParseError(String),

    #[error("Non-numeric rating/amount for {category}: {value}")]
    CoercionError { category: String, value: String },

    #[error("Unrecognized time-of-day token: {0}")]
    UnknownTimeToken(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to write artifact {path}: {source}")]
    WriteError {
        path: String,
        source: std::io::Error,
    },
}
