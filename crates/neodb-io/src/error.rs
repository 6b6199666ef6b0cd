//! Loader and writer errors

use neodb_core::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid close approach JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("malformed CSV at line {line}: {reason}")]
    MalformedCsv { line: usize, reason: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialize close approach: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
}
