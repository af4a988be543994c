use thiserror::Error;

use as_core::PersonId;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan parse error: {0}")]
    Parse(String),

    /// A plan that breaks the activity / leg alternation or time order.
    #[error("invalid plan for {person}: {reason}")]
    Invalid { person: PersonId, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
