//! The `PlanWriter` trait implemented by all backend writers.

use crate::{OutputResult, PlanRow, StageTimingRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// Errors raised while the pipeline runs are stored by
/// [`PlanOutputObserver`](crate::PlanOutputObserver) and retrieved with
/// its `take_error`.
pub trait PlanWriter {
    /// Write a batch of plan rows.
    fn write_plans(&mut self, rows: &[PlanRow]) -> OutputResult<()>;

    /// Write the timing of one finished stage.
    fn write_stage_timing(&mut self, row: &StageTimingRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
