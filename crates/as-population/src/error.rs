//! Population-subsystem error type.

use thiserror::Error;

use as_core::CoreError;

/// Errors produced by `as-population`.
#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("duplicate {table} id {id}")]
    DuplicateId { table: &'static str, id: u64 },

    /// A foreign key points at a row that does not exist.
    #[error("{from} {id} references missing {to}")]
    Unresolved { from: &'static str, id: u64, to: &'static str },

    #[error("{table} {id} not found")]
    NotFound { table: &'static str, id: u64 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PopulationResult<T> = Result<T, PopulationError>;
