//! Error types for the training pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading data, fitting, evaluating or tracking
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("Cannot use non-existent path provided: {0}")]
    PathNotFound(String),

    #[error("No CSV files found in provided data path: {0}")]
    NoCsvFiles(String),

    #[error("Failed to read CSV file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Non-numeric value {value:?} in column {column:?} ({path}, line {line})")]
    NonNumeric {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },

    #[error("Expected {expected} fields, found {found} ({path}, line {line})")]
    TooManyFields {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Dataset is empty: {0}")]
    EmptyData(String),

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Expected exactly two classes in target, found {0}")]
    NotBinary(usize),

    #[error("Input contains missing values in column {0:?}")]
    MissingValues(String),

    #[error("Only one class present in y_true; ROC AUC is not defined")]
    SingleClass,

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Hessian is not positive definite; cannot take a Newton step")]
    Singular,

    #[error("Invalid tracking key: {0:?}")]
    InvalidKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrainError>;
