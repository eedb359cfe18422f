//! Error types for the working-store

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("EIN {ein} not found")]
    EinNotFound { ein: u64 },

    #[error("name '{name}' is not a candidate name for EIN {ein}")]
    UnknownName { ein: u64, name: String },

    #[error("source CSV missing: {path}")]
    SourceMissing { path: PathBuf },

    #[error("malformed table {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
