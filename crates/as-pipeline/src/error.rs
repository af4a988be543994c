use thiserror::Error;

use as_choice::ChoiceError;
use as_core::CoreError;
use as_network::NetworkError;
use as_plans::PlanError;
use as_population::PopulationError;
use as_skims::SkimError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown stage {0:?}")]
    UnknownStage(String),

    /// A stage reads a table that is neither preloaded nor produced by an
    /// earlier stage.
    #[error("stage {stage:?} needs {table:?}, which nothing provides before it")]
    MissingInput { stage: String, table: String },

    /// A stage asked the context for data that has not been loaded.
    #[error("{0:?} is not loaded")]
    NotLoaded(String),

    #[error("model {model:?} has {got} alternatives, expected {expected}")]
    ModelShape { model: String, expected: usize, got: usize },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Skim(#[from] SkimError),

    #[error(transparent)]
    Population(#[from] PopulationError),

    #[error(transparent)]
    Choice(#[from] ChoiceError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
