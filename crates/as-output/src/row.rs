//! Flat rows written by every backend.

pub use as_plans::{PLAN_COLUMNS, PlanRow};

/// Column names of the stage timing table.
pub const STAGE_TIMING_COLUMNS: [&str; 3] = ["stage_index", "stage", "elapsed_ms"];

/// Wall-clock time of one completed stage.
#[derive(Clone, Debug, PartialEq)]
pub struct StageTimingRow {
    pub stage_index: u32,
    pub stage:       String,
    pub elapsed_ms:  f64,
}
