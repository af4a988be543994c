//! Choice-model error type.

use thiserror::Error;

use as_core::CoreError;

#[derive(Debug, Error)]
pub enum ChoiceError {
    #[error("no model named {0:?}")]
    UnknownModel(String),

    #[error("model {model:?}: variable {variable:?} missing for chooser or alternative")]
    MissingVariable { model: String, variable: String },

    #[error("model {model:?}: expected {expected} alternatives, got {got}")]
    AlternativeCount { model: String, expected: usize, got: usize },

    #[error("empty choice set")]
    NoAlternatives,

    /// Utilities produced no finite probability mass.
    #[error("model {0:?}: degenerate utilities")]
    Degenerate(String),

    #[error("no draw in [{lo}, {hi}) after {attempts} attempts")]
    Rejection { lo: f64, hi: f64, attempts: usize },

    #[error("invalid model spec: {0}")]
    InvalidSpec(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ChoiceResult<T> = Result<T, ChoiceError>;
