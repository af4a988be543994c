//! Skim-subsystem error type.

use thiserror::Error;

use as_core::{CoreError, ZoneId};

/// Errors produced by `as-skims`.
#[derive(Debug, Error)]
pub enum SkimError {
    #[error("missing column {0:?}")]
    MissingColumn(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("imputed skims have {got} rows, expected {expected}")]
    RowCount { expected: usize, got: usize },

    #[error("mode {mode:?} has no usable AM-peak distance ratio")]
    MissingModeRatio { mode: String },

    #[error("zone {0} not found in zone table")]
    UnknownZone(ZoneId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SkimResult<T> = Result<T, SkimError>;
