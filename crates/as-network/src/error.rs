//! Network-subsystem error type.

use thiserror::Error;

/// Errors produced by `as-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("edge references unknown node {0}")]
    UnknownNode(i64),

    #[error("duplicate node id {0}")]
    DuplicateNode(i64),

    #[error("no POI category {0:?} registered")]
    UnknownCategory(String),

    #[error("no node variable {0:?} set")]
    UnknownVariable(String),

    #[error("query distance {requested} exceeds the {limit} configured for {what}")]
    BeyondLimit { what: String, requested: f64, limit: f64 },

    #[error("requested {requested} POIs but category {category:?} allows at most {max_items}")]
    TooManyPois { category: String, requested: usize, max_items: usize },

    #[error("{what}: expected {expected} values, got {got}")]
    LengthMismatch { what: String, expected: usize, got: usize },

    #[error("missing column {0:?}")]
    MissingColumn(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
