//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The top-level error type for `as-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown {what} code {code}")]
    UnknownCode { what: &'static str, code: i64 },

    #[error("unknown {what} label {label:?}")]
    UnknownLabel { what: &'static str, label: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `as-core`.
pub type CoreResult<T> = Result<T, CoreError>;
