//! Errors raised while building or filtering the database

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatabaseError {
    /// A close approach time did not match `YYYY-MMM-DD hh:mm`
    #[error("malformed close approach time '{value}': {source}")]
    MalformedTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A close approach names a designation with no matching NEO
    #[error("close approach #{index} references unknown designation '{designation}'")]
    UnlinkableApproach { designation: String, index: usize },

    #[error("unsupported criterion: {0}")]
    UnsupportedCriterion(String),
}
